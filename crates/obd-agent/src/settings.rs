//! Agent configuration
//!
//! Layered from built-in defaults, an optional file (`telemetry.toml` by
//! default) and `TELEMETRY__*` environment variables, e.g.
//! `TELEMETRY__API__BASE_URL` or `TELEMETRY__VEHICLE_ID`.

use crate::AgentError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use telemetry::{CollectorConfig, MAX_BATCH_SAMPLES};
use telemetry_client::ClientConfig;
use uuid::Uuid;

/// What the binary does after loading its configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Sample and upload until interrupted
    #[default]
    Run,
    /// Print the backend's connection status once and exit
    Status,
}

/// OBD adapter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObdConfig {
    /// Character device the adapter is bound to
    pub device: String,
    /// Use simulated readings instead of a device
    pub mock: bool,
    /// Per-command timeout (ms)
    pub timeout_ms: u64,
}

impl Default for ObdConfig {
    fn default() -> Self {
        Self {
            device: "/dev/rfcomm0".to_string(),
            mock: false,
            timeout_ms: 2000,
        }
    }
}

/// Sampling and batching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Samples per upload (at most 180)
    pub max_samples: usize,
    /// Collection window (seconds)
    pub window_secs: u64,
    /// Sampling period (ms), 1 Hz by default
    pub sample_interval_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_samples: MAX_BATCH_SAMPLES,
            window_secs: 180,
            sample_interval_ms: 1000,
        }
    }
}

impl BatchConfig {
    pub fn collector(&self) -> CollectorConfig {
        CollectorConfig {
            max_samples: self.max_samples,
            window: Duration::from_secs(self.window_secs),
        }
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub mode: RunMode,
    /// Vehicle the samples are reported for; must be set
    pub vehicle_id: Uuid,
    pub api: ClientConfig,
    pub obd: ObdConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

impl AgentConfig {
    /// Load from `path` (extension optional, file optional) and the environment
    pub fn load(path: &str) -> Result<Self, AgentError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name(path).required(false))
                .add_source(
                    config::Environment::with_prefix("TELEMETRY")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    /// Load from TOML text only
    pub fn from_toml(toml: &str) -> Result<Self, AgentError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AgentError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        if self.vehicle_id.is_nil() {
            return Err(AgentError::Invalid("vehicle_id must be set".to_string()));
        }
        if self.batch.sample_interval_ms == 0 {
            return Err(AgentError::Invalid(
                "batch.sample_interval_ms must be positive".to_string(),
            ));
        }
        if self.batch.max_samples == 0 || self.batch.max_samples > MAX_BATCH_SAMPLES {
            return Err(AgentError::Invalid(format!(
                "batch.max_samples must be within 1..={MAX_BATCH_SAMPLES}"
            )));
        }
        Ok(())
    }
}
