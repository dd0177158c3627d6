//! OBD-II Protocol Implementation
//!
//! Async PID queries against ELM327-compatible adapters. The adapter is
//! reached through any byte stream (a Bluetooth RFCOMM or USB tty opened as a
//! file, or an in-memory pipe in tests); a deterministic mock mode is
//! available for running without hardware.

mod client;
mod elm;
mod error;
mod pid;

pub use client::{ObdClient, ObdTransport};
pub use error::ObdError;
pub use pid::{Pid, PidResponse};

/// OBD-II mode constants
pub mod mode {
    /// Current data
    pub const CURRENT_DATA: u8 = 0x01;
    /// Positive response offset added to the request mode
    pub const RESPONSE_OFFSET: u8 = 0x40;
}
