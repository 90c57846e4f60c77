//! Client configuration.
//!
//! The only knob is the backend's base endpoint. It is resolved once at
//! startup and never reloaded.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable read by `ClientConfig::from_env`.
pub const ENDPOINT_ENV: &str = "DOB_ENDPOINT";

/// Fixed per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend. Absent or empty means request paths are used
    /// as-is.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
        }
    }

    /// Read the endpoint from `DOB_ENDPOINT`. Unset and empty are the same.
    pub fn from_env() -> Self {
        let endpoint = std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty());
        Self { endpoint }
    }

    /// The endpoint without a trailing slash, or `""` when there is none.
    pub fn base_url(&self) -> &str {
        self.endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/'))
            .unwrap_or("")
    }
}
