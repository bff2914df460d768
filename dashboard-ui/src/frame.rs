//! Rendering-frame suspension point.
//!
//! `next_frame().await` resumes inside the browser's next
//! `requestAnimationFrame` callback, after layout for the previous
//! frame has been committed.

use js_sys::Promise;
use wasm_bindgen_futures::JsFuture;

/// Yield until the next rendering frame.
///
/// Without a window (never the case on a real page) the future stays
/// pending forever instead of spinning.
pub async fn next_frame() {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            if window.request_animation_frame(&resolve).is_err() {
                log::warn!("requestAnimationFrame rejected the callback");
            }
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Yield `count` rendering frames in a row.
pub async fn settle_frames(count: u32) {
    for _ in 0..count {
        next_frame().await;
    }
}
