//! OBD Telemetry Agent - Main Entry Point
//!
//! Usage: `obd-agent [config-path]` (defaults to `telemetry`, any extension)

use anyhow::Context;
use obd_agent::{init_logging, Agent, AgentConfig, RunMode};
use telemetry_client::ApiClient;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "telemetry".to_string());
    let config = AgentConfig::load(&path).with_context(|| format!("loading {path}"))?;
    init_logging(&config.logging)?;

    info!("=== OBD Telemetry Agent v{} ===", env!("CARGO_PKG_VERSION"));

    match config.mode {
        RunMode::Status => {
            let tracker = ApiClient::new(&config.api)?.tracker();
            let status = tracker.connection_status(config.vehicle_id).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        RunMode::Run => {
            let mut agent = Agent::from_config(&config).await?;
            agent
                .run(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("Ctrl-C handler failed, running until killed: {}", e);
                        std::future::pending::<()>().await;
                    }
                })
                .await;
        }
    }

    Ok(())
}
