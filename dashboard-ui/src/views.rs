use shared_types::{NodeRecord, PerformanceSummary, UptimeResponse};

use crate::dom;
use crate::poll::PollView;
use crate::render;

pub const NODES_GRID_ID: &str = "nodes-grid";
pub const NODES_COUNT_ID: &str = "nodes-online-count";
pub const UPTIME_ID: &str = "uptime-display";
pub const PERFORMANCE_ID: &str = "performance-summary";

/// Node card grid backed by the last successful node list
#[derive(Debug, Default)]
pub struct NodeGrid {
    nodes: Vec<NodeRecord>,
}

impl NodeGrid {
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }
}

impl PollView for NodeGrid {
    type Payload = Vec<NodeRecord>;

    fn render(&mut self, nodes: Vec<NodeRecord>) {
        self.nodes = nodes;
        dom::set_inner_html(NODES_GRID_ID, &render::node_cards(&self.nodes));
        dom::set_text(NODES_COUNT_ID, &render::node_summary(&self.nodes));
    }
}

/// Uptime readout; each response overwrites the clock text.
#[derive(Debug, Default)]
pub struct UptimeClock;

impl PollView for UptimeClock {
    type Payload = UptimeResponse;

    fn render(&mut self, payload: UptimeResponse) {
        dom::set_text(UPTIME_ID, &render::format_uptime(payload.uptime_seconds));
    }
}

#[derive(Debug, Default)]
pub struct PerformancePanel;

impl PollView for PerformancePanel {
    type Payload = PerformanceSummary;

    fn render(&mut self, payload: PerformanceSummary) {
        dom::set_inner_html(PERFORMANCE_ID, &render::performance_block(&payload));
    }
}
