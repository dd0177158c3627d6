//! OBD Sampler
//!
//! Polls every telemetry PID once per tick and assembles a sample.

use crate::sample::TelemetrySample;
use obd_protocol::{ObdClient, ObdError, Pid};
use tracing::{debug, warn};
use uuid::Uuid;

/// Builds one `TelemetrySample` per call from an OBD client
pub struct Sampler {
    client: ObdClient,
    vehicle_id: Uuid,
    pids: Vec<Pid>,
}

impl Sampler {
    /// Sample every PID in `Pid::ALL`
    pub fn new(client: ObdClient, vehicle_id: Uuid) -> Self {
        Self::with_pids(client, vehicle_id, Pid::ALL.to_vec())
    }

    pub fn with_pids(client: ObdClient, vehicle_id: Uuid, pids: Vec<Pid>) -> Self {
        Self {
            client,
            vehicle_id,
            pids,
        }
    }

    /// Take one sample
    ///
    /// A PID that is unsupported, times out or returns garbage leaves its
    /// field absent. Adapter-level failures abort the tick.
    pub async fn sample(&mut self) -> Result<TelemetrySample, ObdError> {
        let mut sample = TelemetrySample::now(self.vehicle_id);

        for &pid in &self.pids {
            match self.client.query_pid(pid).await {
                Ok(response) => sample.apply(&response),
                Err(e) if e.is_per_pid() => {
                    debug!("PID {:02X} skipped this tick: {}", pid.as_hex(), e);
                }
                Err(e) => {
                    warn!("Sampling aborted at PID {:02X}: {}", pid.as_hex(), e);
                    return Err(e);
                }
            }
        }

        Ok(sample)
    }

    pub fn vehicle_id(&self) -> Uuid {
        self.vehicle_id
    }

    pub fn client_mut(&mut self) -> &mut ObdClient {
        &mut self.client
    }
}
