//! OBD-II Client for ELM327 Adapters
//!
//! Provides async request/reply exchanges with OBD-II adapters.

use crate::elm::{self, INIT_COMMANDS, PROMPT};
use crate::error::ObdError;
use crate::pid::{Pid, PidResponse};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Default timeout for OBD commands
const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Byte stream an adapter is reached through
pub trait ObdTransport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> ObdTransport for T {}

enum Link {
    Mock { tick: u64 },
    Stream(Box<dyn ObdTransport>),
}

/// OBD-II client for communicating with ELM327-compatible adapters
pub struct ObdClient {
    /// Device path or label (e.g., "/dev/rfcomm0")
    device: String,
    link: Link,
    /// Command timeout
    timeout: Duration,
    /// Whether `initialize` has completed
    connected: bool,
    /// A timed-out command whose reply may still arrive
    stale_reply: bool,
}

impl ObdClient {
    /// Open an adapter exposed as a character device
    ///
    /// The line discipline (baud rate) is expected to be configured by the
    /// system, as it is for Bluetooth RFCOMM bindings.
    pub async fn open(device: &str) -> Result<Self, ObdError> {
        info!("Opening OBD adapter at {}", device);
        let file = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(device)
            .await?;
        Ok(Self::with_transport(device, file))
    }

    /// Wrap an already connected byte stream
    pub fn with_transport<T: ObdTransport + 'static>(device: &str, transport: T) -> Self {
        Self {
            device: device.to_string(),
            link: Link::Stream(Box::new(transport)),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            connected: false,
            stale_reply: false,
        }
    }

    /// Create a mock OBD client for testing (no hardware required)
    pub fn mock() -> Self {
        info!("Creating mock OBD client");
        Self {
            device: "mock".to_string(),
            link: Link::Mock { tick: 0 },
            timeout: Duration::from_millis(100),
            connected: false,
            stale_reply: false,
        }
    }

    /// Reset and configure the adapter
    pub async fn initialize(&mut self) -> Result<(), ObdError> {
        if matches!(self.link, Link::Mock { .. }) {
            debug!("Mock mode: skipping initialization");
            self.connected = true;
            return Ok(());
        }

        info!("Initializing OBD adapter on {}", self.device);
        for command in INIT_COMMANDS {
            let reply = self.exchange(&format!("{command}\r")).await?;
            elm::check_at_reply(command, &reply)?;
            debug!("{} -> {}", command, reply.trim());
        }

        self.connected = true;
        info!("OBD adapter initialized");
        Ok(())
    }

    /// Query a PID and return the decoded response
    pub async fn query_pid(&mut self, pid: Pid) -> Result<PidResponse, ObdError> {
        if !self.connected {
            return Err(ObdError::VehicleNotConnected);
        }

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let raw_bytes = if let Link::Mock { tick } = &mut self.link {
            *tick += 1;
            mock_bytes(pid, *tick)
        } else {
            debug!("Querying PID {:02X}", pid.as_hex());
            let reply = self.exchange(&elm::pid_command(pid)).await?;
            elm::parse_pid_reply(pid, &reply)?
        };

        PidResponse::decode(pid, raw_bytes, timestamp_ms).ok_or_else(|| {
            ObdError::InvalidResponse(format!("short reply for PID {:02X}", pid.as_hex()))
        })
    }

    /// Set command timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Check if client is connected
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether replies are simulated
    pub fn is_mock(&self) -> bool {
        matches!(self.link, Link::Mock { .. })
    }

    /// Device path or label
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Disconnect from the OBD adapter
    pub async fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        info!("Disconnecting OBD client from {}", self.device);
        if let Link::Stream(stream) = &mut self.link {
            if let Err(e) = stream.shutdown().await {
                warn!("Adapter shutdown failed: {}", e);
            }
        }
        self.connected = false;
    }

    /// Send one command and read until the prompt
    async fn exchange(&mut self, command: &str) -> Result<String, ObdError> {
        let timeout = self.timeout;
        let stream = match &mut self.link {
            Link::Stream(stream) => stream,
            Link::Mock { .. } => return Ok(">".to_string()),
        };

        // Consume the reply owed to a timed-out command before sending another
        if self.stale_reply {
            self.stale_reply = false;
            match tokio::time::timeout(timeout, read_until_prompt(stream)).await {
                Ok(late) => {
                    let late = late?;
                    debug!("Discarded late reply {:?}", String::from_utf8_lossy(&late));
                }
                Err(_) => warn!("No late reply within {:?}, resuming", timeout),
            }
        }

        stream.write_all(command.as_bytes()).await?;
        stream.flush().await?;

        match tokio::time::timeout(timeout, read_until_prompt(stream)).await {
            Ok(reply) => Ok(String::from_utf8_lossy(&reply?).into_owned()),
            Err(_) => {
                self.stale_reply = true;
                Err(ObdError::Timeout(timeout.as_millis() as u64))
            }
        }
    }
}

async fn read_until_prompt(stream: &mut Box<dyn ObdTransport>) -> Result<Vec<u8>, ObdError> {
    let mut reply = Vec::with_capacity(64);
    let mut chunk = [0u8; 64];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(ObdError::AdapterNotResponding);
        }
        reply.extend_from_slice(&chunk[..n]);
        if reply.contains(&PROMPT) {
            return Ok(reply);
        }
    }
}

/// Plausible idle-to-cruise readings, deterministic per tick
fn mock_bytes(pid: Pid, tick: u64) -> Vec<u8> {
    let mut hasher = DefaultHasher::new();
    tick.hash(&mut hasher);
    pid.hash(&mut hasher);
    let hash = hasher.finish();

    match pid {
        // 800-3500 rpm
        Pid::Rpm => {
            let encoded = (800 + (hash % 2700) as u16) * 4;
            vec![(encoded >> 8) as u8, (encoded & 0xFF) as u8]
        }
        // 0-120 km/h
        Pid::Speed => vec![(hash % 120) as u8],
        // 70-105°C
        Pid::CoolantTemp => vec![(110 + (hash % 35)) as u8],
        // 20-80%
        Pid::EngineLoad => vec![(51 + (hash % 153)) as u8],
        // -10% to +10%
        Pid::ShortFuelTrim | Pid::LongFuelTrim => vec![(115 + (hash % 26)) as u8],
        // 13.8-14.6 V
        Pid::ControlModuleVoltage => {
            let mv = 13_800 + (hash % 800) as u16;
            vec![(mv >> 8) as u8, (mv & 0xFF) as u8]
        }
    }
}
