use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn html_by_id(id: &str) -> Option<HtmlElement> {
    by_id(id)?.dyn_into::<HtmlElement>().ok()
}

/// Elements matching `selector`, skipping anything that is not an `Element`
pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Replace the content of `#id`. Returns false when the element is absent.
pub fn set_inner_html(id: &str, html: &str) -> bool {
    match by_id(id) {
        Some(element) => {
            element.set_inner_html(html);
            true
        }
        None => false,
    }
}

pub fn set_text(id: &str, text: &str) -> bool {
    match by_id(id) {
        Some(element) => {
            element.set_text_content(Some(text));
            true
        }
        None => false,
    }
}

/// Current vertical scroll offset of the page
pub fn scroll_offset() -> f64 {
    let Some(window) = web_sys::window() else {
        return 0.0;
    };
    match window.scroll_y() {
        Ok(y) if y > 0.0 => y,
        _ => document()
            .and_then(|d| d.document_element())
            .map(|root| f64::from(root.scroll_top()))
            .unwrap_or(0.0),
    }
}

pub fn viewport_height() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

/// Value of `data-page` on `<body>`, the page identity token
pub fn page_identity() -> Option<String> {
    document()?
        .body()?
        .get_attribute("data-page")
        .filter(|page| !page.is_empty())
}

/// Run `f` once the document is parsed: immediately when it already is,
/// otherwise on `DOMContentLoaded`.
pub fn on_dom_ready<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let Some(document) = document() else {
        log::error!("no document on window; dashboard not started");
        return;
    };

    if document.ready_state() != "loading" {
        f();
        return;
    }

    let callback = Closure::once_into_js(f);
    if let Err(e) =
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
    {
        log::error!("failed to add DOMContentLoaded listener: {:?}", e);
    }
}
