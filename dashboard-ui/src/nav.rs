//! Navigation bar collapse and active-page highlighting.

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use crate::dom;

/// Scroll offset (px) past which the navbar collapses. Same threshold
/// in both directions.
pub const COLLAPSE_THRESHOLD: f64 = 10.0;
pub const NAVBAR_SELECTOR: &str = ".navbar";
pub const COLLAPSED_CLASS: &str = "collapsed";
pub const HIGHLIGHT_ROOT_ID: &str = "main-navbar";
pub const ACTIVE_CLASS: &str = "active-page";
pub const PAGE_ATTR: &str = "data-page";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Expanded,
    Collapsed,
}

impl NavState {
    pub fn for_offset(scroll_offset: f64) -> Self {
        if scroll_offset > COLLAPSE_THRESHOLD {
            NavState::Collapsed
        } else {
            NavState::Expanded
        }
    }
}

/// Last applied collapse state
#[derive(Debug, Default)]
pub struct NavCollapse {
    applied: NavState,
}

impl NavCollapse {
    pub fn state(&self) -> NavState {
        self.applied
    }

    /// Returns the new state only when it differs from the applied one.
    pub fn evaluate(&mut self, scroll_offset: f64) -> Option<NavState> {
        let next = NavState::for_offset(scroll_offset);
        if next == self.applied {
            return None;
        }
        self.applied = next;
        Some(next)
    }
}

fn check_collapse(navbar: &Element, machine: &RefCell<NavCollapse>) {
    let Some(state) = machine.borrow_mut().evaluate(dom::scroll_offset()) else {
        return;
    };
    if let Err(e) = navbar
        .class_list()
        .toggle_with_force(COLLAPSED_CLASS, state == NavState::Collapsed)
    {
        log::warn!("failed to toggle navbar collapse: {:?}", e);
    }
}

/// Evaluate once (the page may already be scrolled) and on every scroll.
/// Returns false when the header has no navbar.
pub fn attach_collapse() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let Some(navbar) = dom::document()
        .and_then(|document| document.query_selector(NAVBAR_SELECTOR).ok().flatten())
    else {
        return false;
    };

    let machine = RefCell::new(NavCollapse::default());
    check_collapse(&navbar, &machine);

    let on_scroll = Closure::wrap(Box::new(move |_e: Event| {
        check_collapse(&navbar, &machine);
    }) as Box<dyn FnMut(Event)>);

    if let Err(e) =
        window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
    {
        log::error!("failed to add scroll listener: {:?}", e);
        return false;
    }

    // Lives for the page session
    on_scroll.forget();
    true
}

/// Index of the first item whose identity equals `page_id`.
pub fn active_index<'a, I>(page_id: &str, identities: I) -> Option<usize>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    identities
        .into_iter()
        .position(|identity| identity == Some(page_id))
}

/// Mark the nav item matching the page identity token. Stale markers are
/// cleared first. Returns whether an item was marked.
pub fn highlight_active_nav() -> bool {
    let Some(page_id) = dom::page_identity() else {
        return false;
    };
    let Some(root) = dom::by_id(HIGHLIGHT_ROOT_ID) else {
        return false;
    };

    for stale in dom::query_all(&root, &format!(".{ACTIVE_CLASS}")) {
        if let Err(e) = stale.class_list().remove_1(ACTIVE_CLASS) {
            log::warn!("failed to clear stale nav marker: {:?}", e);
        }
    }

    let items = dom::query_all(&root, &format!("[{PAGE_ATTR}]"));
    let identities: Vec<Option<String>> = items
        .iter()
        .map(|item| item.get_attribute(PAGE_ATTR))
        .collect();

    let Some(index) = active_index(&page_id, identities.iter().map(|id| id.as_deref())) else {
        return false;
    };
    items[index].class_list().add_1(ACTIVE_CLASS).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_past_threshold_only() {
        assert_eq!(NavState::for_offset(0.0), NavState::Expanded);
        assert_eq!(NavState::for_offset(10.0), NavState::Expanded);
        assert_eq!(NavState::for_offset(10.5), NavState::Collapsed);
    }

    #[test]
    fn at_top_initial_evaluation_writes_nothing() {
        let mut nav = NavCollapse::default();
        assert_eq!(nav.evaluate(0.0), None);
    }

    #[test]
    fn toggles_once_per_crossing() {
        let mut nav = NavCollapse::default();
        let offsets = [0.0, 5.0, 11.0, 40.0, 300.0, 12.0, 10.0, 3.0, 0.0, 50.0];
        let toggles: Vec<NavState> = offsets
            .iter()
            .filter_map(|offset| nav.evaluate(*offset))
            .collect();

        assert_eq!(
            toggles,
            vec![NavState::Collapsed, NavState::Expanded, NavState::Collapsed]
        );
        assert_eq!(nav.state(), NavState::Collapsed);
    }

    #[test]
    fn already_scrolled_page_collapses_on_attach() {
        let mut nav = NavCollapse::default();
        assert_eq!(nav.evaluate(420.0), Some(NavState::Collapsed));
    }

    #[test]
    fn active_index_finds_matching_identity() {
        let items = [Some("dashboard"), None, Some("mesh"), Some("mesh")];
        assert_eq!(active_index("mesh", items), Some(2));
    }

    #[test]
    fn active_index_without_match_is_none() {
        let items = [Some("dashboard"), Some("sigint"), None];
        assert_eq!(active_index("mesh", items), None);
        assert_eq!(active_index("mesh", std::iter::empty::<Option<&str>>()), None);
    }
}
