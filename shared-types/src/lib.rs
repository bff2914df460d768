//! Shared types between the dashboard server and the browser client
//!
//! Every payload the client polls or posts is described here so the
//! JSON contract lives in one place. All types are serde-friendly and
//! tolerate extra fields the server may add over time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Nodes
// ============================================================================

/// One cluster node as reported by `/api/nodes/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub ip: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub online: bool,
    pub status: String,
}

impl NodeRecord {
    /// CSS state class used by the node card grid
    pub fn state_class(&self) -> &'static str {
        if self.online {
            "online"
        } else {
            "offline"
        }
    }
}

/// Response of `/api/nodes/{id}/tools`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeToolsResponse {
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub node_name: Option<String>,
    /// Category -> tool names, kept sorted by category
    #[serde(default)]
    pub tools: BTreeMap<String, Vec<String>>,
}

impl NodeToolsResponse {
    pub fn tool_count(&self) -> usize {
        self.tools.values().map(Vec::len).sum()
    }
}

/// Response of `POST /api/nodes/{id}/tool/{tool}?action=..`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ToolActionResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ToolActionResponse {
    /// Operator-facing summary: the message wins over the bare status
    pub fn summary(&self) -> Option<&str> {
        self.message.as_deref().or(self.status.as_deref())
    }
}

// ============================================================================
// Telemetry
// ============================================================================

/// Response of `/api/uptime`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UptimeResponse {
    pub uptime_seconds: f64,
}

/// Response of `/api/performance/summary`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PerformanceSummary {
    pub cpu_avg: f64,
    pub memory_avg: f64,
    pub disk_usage: f64,
    pub network_throughput_mbps: f64,
    pub temperature_avg: f64,
}

// ============================================================================
// Errors
// ============================================================================

/// Error body the server returns alongside non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiError {
    pub error: String,
}

// ============================================================================
// Endpoints
// ============================================================================

pub const ENDPOINT_HEADER: &str = "/header";
pub const ENDPOINT_FOOTER: &str = "/footer";
pub const ENDPOINT_UPTIME: &str = "/api/uptime";
pub const ENDPOINT_NODES_LIST: &str = "/api/nodes/list";
pub const ENDPOINT_PERFORMANCE_SUMMARY: &str = "/api/performance/summary";

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_record_reads_type_field() {
        let nodes: Vec<NodeRecord> = serde_json::from_value(json!([
            {
                "id": "boot",
                "name": "Boot Node",
                "type": "infrastructure",
                "ip": "192.168.1.10",
                "online": true,
                "status": "online"
            },
            {
                "id": "vhf",
                "name": "VHF Node",
                "type": "radio",
                "ip": "192.168.1.40",
                "online": false,
                "status": "offline"
            }
        ]))
        .unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].node_type, "infrastructure");
        assert_eq!(nodes[0].state_class(), "online");
        assert_eq!(nodes[1].state_class(), "offline");
    }

    #[test]
    fn tools_response_ignores_extra_fields() {
        let response: NodeToolsResponse = serde_json::from_value(json!({
            "node_id": "mesh",
            "node_name": "Mesh Node",
            "node_type": "networking",
            "purpose": "Mesh networking",
            "tools": {
                "routing": ["OLSR Monitor", "Peer Status"],
                "mesh": ["Batman-adv Status"]
            },
            "available_tools_count": 3
        }))
        .unwrap();

        assert_eq!(response.tool_count(), 3);
        let categories: Vec<_> = response.tools.keys().cloned().collect();
        assert_eq!(categories, vec!["mesh", "routing"]);
    }

    #[test]
    fn tool_action_summary_prefers_message() {
        let both: ToolActionResponse = serde_json::from_value(json!({
            "status": "demo_response",
            "message": "Start on dump1090"
        }))
        .unwrap();
        assert_eq!(both.summary(), Some("Start on dump1090"));

        let status_only: ToolActionResponse =
            serde_json::from_value(json!({ "status": "ok" })).unwrap();
        assert_eq!(status_only.summary(), Some("ok"));

        assert_eq!(ToolActionResponse::default().summary(), None);
    }

    #[test]
    fn uptime_accepts_integer_seconds() {
        let uptime: UptimeResponse =
            serde_json::from_value(json!({ "uptime_seconds": 3725 })).unwrap();
        assert_eq!(uptime.uptime_seconds, 3725.0);
    }

    #[test]
    fn performance_summary_tolerates_timestamp() {
        let perf: PerformanceSummary = serde_json::from_value(json!({
            "cpu_avg": 35.2,
            "memory_avg": 62.1,
            "disk_usage": 78.5,
            "network_throughput_mbps": 45.3,
            "temperature_avg": 51.2,
            "timestamp": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(perf.cpu_avg, 35.2);
        assert_eq!(perf.temperature_avg, 51.2);
    }
}
