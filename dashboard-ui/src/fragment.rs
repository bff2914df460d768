//! Header/footer fragment injection.
//!
//! Failures here go to the console only; they are never operator
//! visible and never reach the activity sink.

use thiserror::Error;

use crate::api::{fetch_text, FetchError};
use crate::dom;
use crate::frame::settle_frames;

pub const HEADER_CONTAINER_ID: &str = "header-container";
pub const FOOTER_CONTAINER_ID: &str = "footer-embed-container";

/// Frames to yield after injection before dependents may measure layout.
/// Nested fragment markup is not reliably laid out until after one paint.
pub const SETTLE_FRAMES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("container #{0} not found")]
    MissingContainer(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Fetch `endpoint`, replace the content of `#container_id` with it and
/// resolve once the injected markup has settled.
pub async fn load_fragment(endpoint: &str, container_id: &str) -> Result<(), FragmentError> {
    if dom::by_id(container_id).is_none() {
        return Err(FragmentError::MissingContainer(container_id.to_string()));
    }

    let html = fetch_text(endpoint).await?;

    // The page may have dropped the placeholder while the request was out.
    if !dom::set_inner_html(container_id, &html) {
        return Err(FragmentError::MissingContainer(container_id.to_string()));
    }

    settle_frames(SETTLE_FRAMES).await;
    log::debug!("fragment {} ready in #{}", endpoint, container_id);
    Ok(())
}
