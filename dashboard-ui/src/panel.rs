//! Keeps open slide panels anchored above the footer.
//!
//! Instead of listening for scroll and resize, the tracker recomputes
//! every panel offset once per rendering frame for the rest of the page
//! session; panels may open at any time.

use std::cell::Cell;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;

use crate::dom;
use crate::fragment::FOOTER_CONTAINER_ID;
use crate::frame::next_frame;

pub const PANEL_SELECTOR: &str = ".slide-panel.open";
pub const REFERENCE_CONTAINER_ID: &str = FOOTER_CONTAINER_ID;

thread_local! {
    static TRACKER_STARTED: Cell<bool> = const { Cell::new(false) };
}

/// Viewport-relative vertical extent of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalBounds {
    pub top: f64,
    pub bottom: f64,
}

/// Height of the part of `bounds` inside `[0, viewport_height]`, never negative.
pub fn visible_height(bounds: VerticalBounds, viewport_height: f64) -> f64 {
    let visible_top = bounds.top.max(0.0);
    let visible_bottom = bounds.bottom.min(viewport_height);
    (visible_bottom - visible_top).max(0.0)
}

/// Start the per-frame tracker. Later calls are no-ops; returns whether
/// this call started it.
pub fn start_tracker() -> bool {
    if TRACKER_STARTED.with(|started| started.replace(true)) {
        return false;
    }

    spawn_local(async {
        loop {
            next_frame().await;
            reanchor_panels();
        }
    });
    log::debug!("panel tracker started");
    true
}

/// One correction pass. Returns how many panels were repositioned.
pub fn reanchor_panels() -> usize {
    let Some(document) = dom::document() else {
        return 0;
    };
    let Some(root) = document.document_element() else {
        return 0;
    };

    let panels = dom::query_all(&root, PANEL_SELECTOR);
    if panels.is_empty() {
        return 0;
    }
    let Some(reference) = document.get_element_by_id(REFERENCE_CONTAINER_ID) else {
        return 0;
    };

    let rect = reference.get_bounding_client_rect();
    let offset = visible_height(
        VerticalBounds {
            top: rect.top(),
            bottom: rect.bottom(),
        },
        dom::viewport_height(),
    );
    let bottom = format!("{offset}px");

    let mut moved = 0;
    for panel in panels {
        let Ok(panel) = panel.dyn_into::<HtmlElement>() else {
            continue;
        };
        if panel.style().set_property("bottom", &bottom).is_ok() {
            moved += 1;
        }
    }
    moved
}
