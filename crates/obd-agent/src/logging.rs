//! Logging setup

use crate::settings::LoggingConfig;
use crate::AgentError;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), AgentError> {
    let level = Level::from_str(&config.level)
        .map_err(|_| AgentError::Logging(format!("unknown log level '{}'", config.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    installed.map_err(|e| AgentError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_rejected() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            json: false,
        };
        assert!(matches!(init_logging(&config), Err(AgentError::Logging(_))));
    }
}
