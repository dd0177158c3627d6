//! API Error Types

use telemetry::TelemetryError;
use thiserror::Error;

/// Errors surfaced by telemetry API calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL could not be parsed or cannot carry paths
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Connection refused, DNS failure, timeout or broken body
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("Could not decode response: {0}")]
    Decode(String),

    /// Rejected locally before any request was made
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl ApiError {
    /// Whether the request hit the fixed timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }

    /// HTTP status, for errors the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
