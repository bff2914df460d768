//! Read-only page configuration injected by the host page as
//! `window.DASHBOARD_CONFIG`.

use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::dom;

pub const CONFIG_GLOBAL: &str = "DASHBOARD_CONFIG";
pub const PLACEHOLDER: &str = "UNKNOWN";

pub const BUILD_VERSION_ID: &str = "build-version";
pub const CLUSTER_ID_ID: &str = "cluster-id";
pub const SESSION_ID_ID: &str = "session-id";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("window.DASHBOARD_CONFIG is not defined")]
    Missing,
    #[error("window.DASHBOARD_CONFIG could not be serialized: {0}")]
    NotSerializable(String),
    #[error("window.DASHBOARD_CONFIG is not valid JSON: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub dashboard_build: String,
    pub cluster_id: String,
    pub session_id: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dashboard_build: PLACEHOLDER.to_string(),
            cluster_id: PLACEHOLDER.to_string(),
            session_id: PLACEHOLDER.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Missing, empty or non-string fields fall back to the placeholder.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .unwrap_or(PLACEHOLDER)
                .to_string()
        };
        Self {
            dashboard_build: field("dashboard_build"),
            cluster_id: field("cluster_id"),
            session_id: field("session_id"),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(Self::from_value(&value))
    }

    fn read_global() -> Result<Self, ConfigError> {
        let window = web_sys::window().ok_or(ConfigError::Missing)?;
        let raw = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
            .map_err(|_| ConfigError::Missing)?;
        if raw.is_undefined() || raw.is_null() {
            return Err(ConfigError::Missing);
        }
        let text = js_sys::JSON::stringify(&raw)
            .map_err(|e| ConfigError::NotSerializable(format!("{e:?}")))?;
        Self::from_json(&String::from(text))
    }

    /// Read the injected config, falling back to placeholders.
    pub fn from_window() -> Self {
        match Self::read_global() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using placeholder config");
                Self::default()
            }
        }
    }

    /// Write the config into the footer fields that exist. Returns how
    /// many were written.
    pub fn apply_to_footer(&self) -> usize {
        [
            (BUILD_VERSION_ID, &self.dashboard_build),
            (CLUSTER_ID_ID, &self.cluster_id),
            (SESSION_ID_ID, &self.session_id),
        ]
        .into_iter()
        .filter(|(id, value)| dom::set_text(id, value))
        .count()
    }
}
