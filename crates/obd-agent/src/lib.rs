//! OBD Telemetry Agent
//!
//! Samples the vehicle once per tick, batches the samples and uploads each
//! batch as it fills. On shutdown the partial batch is flushed and the
//! vehicle is reported disconnected.

mod agent;
mod logging;
mod settings;

pub use agent::{Agent, AgentStats};
pub use logging::init_logging;
pub use settings::{AgentConfig, BatchConfig, LoggingConfig, ObdConfig, RunMode};

use obd_protocol::ObdError;
use telemetry_client::ApiError;
use thiserror::Error;

/// Agent errors
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Obd(#[from] ObdError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
