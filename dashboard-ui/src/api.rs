use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared_types::{ApiError, NodeToolsResponse, ToolActionResponse};
use std::sync::OnceLock;
use thiserror::Error;

/// Get the API base URL from the page origin.
/// The dashboard server serves both the pages and the API, so every
/// endpoint is same-origin.
fn get_api_base() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Lazy-static equivalent for WASM - computed at first use
static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

/// Get the cached API base URL
pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

fn url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Failure of a single request. The `Display` output doubles as the
/// dedup key for repeated poll failures, so it must stay stable across
/// identical failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("HTTP {status}: {error}")]
    Rejected { status: u16, error: String },
    #[error("request failed: {0}")]
    Network(String),
    #[error("failed to parse JSON: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    fn builder(self, url: &str) -> RequestBuilder {
        match self {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
        }
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, FetchError> {
    let response = builder
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        // Error bodies are best effort; an unreadable one keeps the bare status.
        return Err(match response.json::<ApiError>().await {
            Ok(body) => FetchError::Rejected {
                status,
                error: body.error,
            },
            Err(_) => FetchError::Status(status),
        });
    }

    Ok(response)
}

pub async fn request_json<T: DeserializeOwned>(
    method: HttpMethod,
    path: &str,
) -> Result<T, FetchError> {
    let response = send(method.builder(&url(path))).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// Fetch an HTML fragment as text
pub async fn fetch_text(path: &str) -> Result<String, FetchError> {
    let response = send(Request::get(&url(path))).await?;
    response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))
}

// ============================================================================
// Node tool API Functions
// ============================================================================

fn encode_segment(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}

pub fn node_tools_path(node_id: &str) -> String {
    format!("/api/nodes/{}/tools", encode_segment(node_id))
}

pub fn tool_action_path(node_id: &str, tool: &str) -> String {
    format!(
        "/api/nodes/{}/tool/{}",
        encode_segment(node_id),
        encode_segment(tool)
    )
}

pub async fn fetch_node_tools(node_id: &str) -> Result<NodeToolsResponse, FetchError> {
    request_json(HttpMethod::Get, &node_tools_path(node_id)).await
}

pub async fn post_tool_action(
    node_id: &str,
    tool: &str,
    action: &str,
) -> Result<ToolActionResponse, FetchError> {
    let builder =
        Request::post(&url(&tool_action_path(node_id, tool))).query([("action", action)]);
    let response = send(builder).await?;
    response
        .json::<ToolActionResponse>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display_is_stable_dedup_key() {
        assert_eq!(FetchError::Status(503).to_string(), "HTTP 503");
        assert_eq!(
            FetchError::Rejected {
                status: 404,
                error: "Node not found".to_string(),
            }
            .to_string(),
            "HTTP 404: Node not found"
        );
        assert_eq!(
            FetchError::Network("Failed to fetch".to_string()).to_string(),
            FetchError::Network("Failed to fetch".to_string()).to_string()
        );
    }
}
