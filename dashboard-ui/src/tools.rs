//! Node tool panel: the signal selector and fire-and-report tool actions.

use std::cell::RefCell;
use std::rc::Rc;

use shared_types::ToolActionResponse;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlSelectElement};

use crate::api::{fetch_node_tools, post_tool_action, FetchError};
use crate::dom;
use crate::poll::ErrorDedup;
use crate::render::{self, ActivityLevel};
use crate::sink::ActivitySink;

pub const SIGNAL_SELECT_ID: &str = "signal-node-select";
pub const SIGNAL_TOOLS_ID: &str = "signal-tools";
pub const TOOL_BUTTON_SELECTOR: &str = ".tool-btn";
pub const DEFAULT_ACTION: &str = "start";

/// Operator notice for a finished tool action
pub fn tool_action_notice(
    node_id: &str,
    tool: &str,
    result: &Result<ToolActionResponse, FetchError>,
) -> (ActivityLevel, String) {
    match result {
        Ok(response) => (
            ActivityLevel::Info,
            format!(
                "{tool} on {node_id}: {}",
                response.summary().unwrap_or("ok")
            ),
        ),
        Err(e) => (
            ActivityLevel::Error,
            format!("Tool action failed: {tool} on {node_id}: {e}"),
        ),
    }
}

pub async fn run_tool_action(node_id: &str, tool: &str, action: &str, sink: &dyn ActivitySink) {
    let result = post_tool_action(node_id, tool, action).await;
    let (level, message) = tool_action_notice(node_id, tool, &result);
    sink.report(level, &message);
}

/// Fetch the tool list for `node_id` and render it into the tool panel.
pub async fn refresh_signal_tools(
    node_id: String,
    sink: Rc<dyn ActivitySink>,
    errors: Rc<RefCell<ErrorDedup>>,
) {
    match fetch_node_tools(&node_id).await {
        Ok(tools) => {
            errors.borrow_mut().success();
            log::debug!(
                "rendering {} tool(s) for {}",
                tools.tool_count(),
                tools
                    .node_name
                    .as_deref()
                    .or(tools.node_id.as_deref())
                    .unwrap_or(&node_id)
            );
            dom::set_inner_html(SIGNAL_TOOLS_ID, &render::tool_buttons(&node_id, &tools));
        }
        Err(e) => {
            let notice = errors.borrow_mut().failure(e.to_string());
            if let Some(message) = notice {
                sink.report(
                    ActivityLevel::Error,
                    &format!("Signal update failed: {message}"),
                );
            }
        }
    }
}

pub fn attach_signal_selector(sink: Rc<dyn ActivitySink>) -> bool {
    let Some(select) = dom::by_id(SIGNAL_SELECT_ID)
        .and_then(|element| element.dyn_into::<HtmlSelectElement>().ok())
    else {
        return false;
    };

    let errors = Rc::new(RefCell::new(ErrorDedup::default()));
    let target = select.clone();
    let on_change = Closure::wrap(Box::new(move |_e: Event| {
        let node_id = target.value();
        if node_id.is_empty() {
            return;
        }
        spawn_local(refresh_signal_tools(
            node_id,
            Rc::clone(&sink),
            Rc::clone(&errors),
        ));
    }) as Box<dyn FnMut(Event)>);

    if let Err(e) =
        select.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
    {
        log::error!("failed to add signal selector listener: {:?}", e);
        return false;
    }
    on_change.forget();
    true
}

/// Delegated click handling for tool buttons rendered into the panel.
pub fn attach_tool_buttons(sink: Rc<dyn ActivitySink>) -> bool {
    let Some(panel) = dom::by_id(SIGNAL_TOOLS_ID) else {
        return false;
    };

    let on_click = Closure::wrap(Box::new(move |e: Event| {
        let Some(button) = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|t| t.closest(TOOL_BUTTON_SELECTOR).ok().flatten())
        else {
            return;
        };
        let (Some(node_id), Some(tool)) = (
            button.get_attribute("data-node"),
            button.get_attribute("data-tool"),
        ) else {
            return;
        };
        let action = button
            .get_attribute("data-action")
            .unwrap_or_else(|| DEFAULT_ACTION.to_string());

        let sink = Rc::clone(&sink);
        spawn_local(async move {
            run_tool_action(&node_id, &tool, &action, sink.as_ref()).await;
        });
    }) as Box<dyn FnMut(Event)>);

    if let Err(e) =
        panel.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
    {
        log::error!("failed to add tool button listener: {:?}", e);
        return false;
    }
    on_click.forget();
    true
}
