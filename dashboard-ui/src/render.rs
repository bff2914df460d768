//! Markup builders for every widget the client writes.
//!
//! Everything here is pure string building so it can be exercised
//! without a browser; the views decide where the markup goes.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use shared_types::{NodeRecord, NodeToolsResponse, PerformanceSummary};

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Activity entries
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ActivityLevel {
    pub fn class(self) -> &'static str {
        match self {
            ActivityLevel::Info => "info",
            ActivityLevel::Success => "success",
            ActivityLevel::Warning => "warning",
            ActivityLevel::Error => "error",
        }
    }
}

pub fn activity_entry(level: ActivityLevel, message: &str, at: DateTime<Utc>) -> String {
    format!(
        r#"<div class="log-entry {}"><span class="log-time">{}</span> <span class="log-msg">{}</span></div>"#,
        level.class(),
        at.with_timezone(&Local).format("%H:%M:%S"),
        escape_html(message)
    )
}

// ============================================================================
// Poll widgets
// ============================================================================

/// `HH:MM:SS`, hours unbounded. Negative or fractional input is floored at zero.
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

pub fn node_cards(nodes: &[NodeRecord]) -> String {
    let mut html = String::new();
    for node in nodes {
        let _ = write!(
            html,
            concat!(
                r#"<div class="node-card {state}" data-node="{id}">"#,
                r#"<div class="node-name">{name}</div>"#,
                r#"<div class="node-meta"><span class="node-type">{node_type}</span>"#,
                r#" <span class="node-ip">{ip}</span></div>"#,
                r#"<div class="node-status">{status}</div>"#,
                "</div>"
            ),
            state = node.state_class(),
            id = escape_html(&node.id),
            name = escape_html(&node.name),
            node_type = escape_html(&node.node_type),
            ip = escape_html(&node.ip),
            status = escape_html(&node.status.to_uppercase()),
        );
    }
    html
}

pub fn node_summary(nodes: &[NodeRecord]) -> String {
    let online = nodes.iter().filter(|node| node.online).count();
    format!("{online}/{} ONLINE", nodes.len())
}

pub fn performance_block(perf: &PerformanceSummary) -> String {
    let rows = [
        ("CPU", format!("{:.1}%", perf.cpu_avg)),
        ("Memory", format!("{:.1}%", perf.memory_avg)),
        ("Disk", format!("{:.1}%", perf.disk_usage)),
        ("Network", format!("{:.1} Mbps", perf.network_throughput_mbps)),
        ("Temperature", format!("{:.1}&deg;C", perf.temperature_avg)),
    ];

    let mut html = String::from(r#"<div class="perf-grid">"#);
    for (label, value) in rows {
        let _ = write!(
            html,
            r#"<div class="perf-row"><span class="perf-label">{label}</span><span class="perf-value">{value}</span></div>"#
        );
    }
    html.push_str("</div>");
    html
}

/// Tool buttons for the signal panel, one group per category.
/// Buttons carry the attributes the click delegation in `tools` reads.
pub fn tool_buttons(node_id: &str, tools: &NodeToolsResponse) -> String {
    if tools.tools.is_empty() {
        return r#"<div class="tool-empty">No tools available</div>"#.to_string();
    }

    let node_id = escape_html(node_id);
    let mut html = String::new();
    for (category, names) in &tools.tools {
        let _ = write!(
            html,
            r#"<div class="tool-group"><h5>{}</h5>"#,
            escape_html(&category.to_uppercase())
        );
        for name in names {
            let name = escape_html(name);
            let _ = write!(
                html,
                r#"<button class="tool-btn" data-node="{node_id}" data-tool="{name}" data-action="start">{name}</button>"#
            );
        }
        html.push_str("</div>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn node(id: &str, online: bool) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            name: format!("{id} node"),
            ip: "192.168.1.10".to_string(),
            node_type: "infrastructure".to_string(),
            online,
            status: if online { "online" } else { "offline" }.to_string(),
        }
    }

    #[test]
    fn uptime_formats_as_clock() {
        assert_eq!(format_uptime(3725.0), "01:02:05");
        assert_eq!(format_uptime(0.0), "00:00:00");
        assert_eq!(format_uptime(59.9), "00:00:59");
        assert_eq!(format_uptime(360_000.0), "100:00:00");
    }

    #[test]
    fn uptime_floors_bad_input_at_zero() {
        assert_eq!(format_uptime(-5.0), "00:00:00");
        assert_eq!(format_uptime(f64::NAN), "00:00:00");
    }

    #[test]
    fn node_cards_carry_one_state_class_each() {
        let html = node_cards(&[node("boot", true), node("vhf", false)]);
        assert_eq!(html.matches(r#"class="node-card online""#).count(), 1);
        assert_eq!(html.matches(r#"class="node-card offline""#).count(), 1);
        assert!(html.contains("OFFLINE"));
    }

    #[test]
    fn node_cards_escape_server_text() {
        let mut evil = node("x", true);
        evil.name = "<script>alert(1)</script>".to_string();
        let html = node_cards(&[evil]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn node_summary_counts_online() {
        let nodes = [node("a", true), node("b", false), node("c", true)];
        assert_eq!(node_summary(&nodes), "2/3 ONLINE");
        assert_eq!(node_summary(&[]), "0/0 ONLINE");
    }

    #[test]
    fn performance_block_renders_fixed_fields() {
        let html = performance_block(&PerformanceSummary {
            cpu_avg: 35.2,
            memory_avg: 62.1,
            disk_usage: 78.5,
            network_throughput_mbps: 45.3,
            temperature_avg: 51.2,
        });
        assert_eq!(html.matches("perf-row").count(), 5);
        assert!(html.contains("35.2%"));
        assert!(html.contains("45.3 Mbps"));
        assert!(html.contains("51.2&deg;C"));
    }

    #[test]
    fn activity_entry_escapes_message() {
        let html = activity_entry(ActivityLevel::Error, "a < b & c", Utc::now());
        assert!(html.starts_with(r#"<div class="log-entry error">"#));
        assert!(html.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn tool_buttons_group_by_category() {
        let mut tools = BTreeMap::new();
        tools.insert("sdr".to_string(), vec!["GQRX".to_string()]);
        tools.insert(
            "vhf".to_string(),
            vec!["VHF Receiver".to_string(), "Squelch Monitor".to_string()],
        );
        let response = NodeToolsResponse {
            tools,
            ..Default::default()
        };

        let html = tool_buttons("vhf", &response);
        assert_eq!(html.matches("tool-group").count(), 2);
        assert_eq!(html.matches("tool-btn").count(), 3);
        assert!(html.contains(r#"data-tool="VHF Receiver""#));
        assert!(html.find("SDR").unwrap() < html.find("VHF").unwrap());
    }

    #[test]
    fn tool_buttons_placeholder_when_empty() {
        let html = tool_buttons("boot", &NodeToolsResponse::default());
        assert!(html.contains("No tools available"));
    }
}
