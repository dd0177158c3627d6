//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Applied to every request, connect through body
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Backend location, resolved per runtime environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL the API paths are joined onto, e.g. `https://api.example.com/v1`
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}
