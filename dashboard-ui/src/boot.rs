//! Page bootstrap: wires fragments, poll loops and the activity sink.

use std::cell::Cell;
use std::rc::Rc;

use shared_types::{ENDPOINT_FOOTER, ENDPOINT_HEADER};
use wasm_bindgen_futures::spawn_local;

use crate::config::DashboardConfig;
use crate::dom;
use crate::fragment::{load_fragment, FOOTER_CONTAINER_ID, HEADER_CONTAINER_ID};
use crate::nav;
use crate::panel;
use crate::poll::{self, NODES_POLL, PERFORMANCE_POLL, UPTIME_POLL};
use crate::sink::{ActivitySink, DeferredSink, DomSurfaces};
use crate::tools;
use crate::views::{NodeGrid, PerformancePanel, UptimeClock};

thread_local! {
    static BOOTED: Cell<bool> = const { Cell::new(false) };
}

/// Boot once the document is parsed.
pub fn start() {
    dom::on_dom_ready(|| {
        if !boot() {
            log::warn!("dashboard already booted");
        }
    });
}

/// Start every live component. Returns false if already booted.
/// Each started task keeps its own state alive for the page session.
pub fn boot() -> bool {
    if BOOTED.with(|booted| booted.replace(true)) {
        return false;
    }

    let config = DashboardConfig::from_window();
    log::info!(
        "dashboard {} booting for cluster {}",
        config.dashboard_build,
        config.cluster_id
    );

    let sink = Rc::new(DeferredSink::new(DomSurfaces));
    sink.watch();
    let operator: Rc<dyn ActivitySink> = sink;

    spawn_local(async {
        match load_fragment(ENDPOINT_HEADER, HEADER_CONTAINER_ID).await {
            Ok(()) => {
                if !nav::attach_collapse() {
                    log::warn!("header has no navbar; collapse disabled");
                }
                nav::highlight_active_nav();
                panel::start_tracker();
            }
            Err(e) => log::error!("header load error: {e}"),
        }
    });

    spawn_local(async move {
        match load_fragment(ENDPOINT_FOOTER, FOOTER_CONTAINER_ID).await {
            Ok(()) => {
                config.apply_to_footer();
                panel::start_tracker();
            }
            Err(e) => log::error!("footer load error: {e}"),
        }
    });

    poll::start(NODES_POLL, NodeGrid::default(), Rc::clone(&operator));
    poll::start(UPTIME_POLL, UptimeClock, Rc::clone(&operator));
    poll::start(
        PERFORMANCE_POLL,
        PerformancePanel,
        Rc::clone(&operator),
    );

    tools::attach_signal_selector(Rc::clone(&operator));
    tools::attach_tool_buttons(operator);
    true
}
