//! OBD-II PID Definitions and Response Decoding
//!
//! The Mode 01 PIDs that make up a telemetry sample, with their standard
//! decoding formulas.

use serde::{Deserialize, Serialize};

/// Mode 01 PIDs sampled for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Pid {
    /// Calculated engine load (0x04)
    EngineLoad = 0x04,
    /// Engine coolant temperature (0x05)
    CoolantTemp = 0x05,
    /// Short-term fuel trim bank 1 (0x06)
    ShortFuelTrim = 0x06,
    /// Long-term fuel trim bank 1 (0x07)
    LongFuelTrim = 0x07,
    /// Engine RPM (0x0C)
    Rpm = 0x0C,
    /// Vehicle speed (0x0D)
    Speed = 0x0D,
    /// Control module voltage (0x42), read as battery voltage
    ControlModuleVoltage = 0x42,
}

impl Pid {
    /// Every PID in the order a sampling tick queries them
    pub const ALL: [Pid; 7] = [
        Pid::Rpm,
        Pid::Speed,
        Pid::ControlModuleVoltage,
        Pid::CoolantTemp,
        Pid::EngineLoad,
        Pid::ShortFuelTrim,
        Pid::LongFuelTrim,
    ];

    /// Get the PID hex value
    pub fn as_hex(&self) -> u8 {
        *self as u8
    }

    /// Look up a PID by its hex value
    pub fn from_hex(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|pid| pid.as_hex() == value)
    }

    /// Get the number of data bytes in a response for this PID
    pub fn response_bytes(&self) -> usize {
        match self {
            Pid::Rpm | Pid::ControlModuleVoltage => 2,
            _ => 1,
        }
    }

    /// Decode the data bytes with this PID's formula
    pub fn decode(&self, bytes: &[u8]) -> Option<f64> {
        if bytes.len() < self.response_bytes() {
            return None;
        }
        let a = bytes[0] as f64;
        let value = match self {
            // ((A*256)+B)/4 rpm
            Pid::Rpm => (a * 256.0 + bytes[1] as f64) / 4.0,
            // A km/h
            Pid::Speed => a,
            // A - 40 °C
            Pid::CoolantTemp => a - 40.0,
            // A * 100 / 255 %
            Pid::EngineLoad => a * 100.0 / 255.0,
            // (A - 128) * 100 / 128 %
            Pid::ShortFuelTrim | Pid::LongFuelTrim => (a - 128.0) * 100.0 / 128.0,
            // ((A*256)+B)/1000 V
            Pid::ControlModuleVoltage => (a * 256.0 + bytes[1] as f64) / 1000.0,
        };
        Some(value)
    }
}

/// Decoded response from a PID query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidResponse {
    /// The PID that was queried
    pub pid: Pid,
    /// Timestamp when the response was received (Unix ms)
    pub timestamp_ms: u64,
    /// Decoded value
    pub value: f64,
    /// Raw data bytes from the response
    pub raw_bytes: Vec<u8>,
}

impl PidResponse {
    /// Decode raw data bytes for `pid`, or `None` if too few bytes arrived
    pub fn decode(pid: Pid, raw_bytes: Vec<u8>, timestamp_ms: u64) -> Option<Self> {
        let value = pid.decode(&raw_bytes)?;
        Some(Self {
            pid,
            timestamp_ms,
            value,
            raw_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpm_decode() {
        // ((0x1A * 256) + 0x2B) / 4 = 6699 / 4 = 1674.75
        let response = PidResponse::decode(Pid::Rpm, vec![0x1A, 0x2B], 0).unwrap();
        assert!((response.value - 1674.75).abs() < 0.01);
    }

    #[test]
    fn test_coolant_temp_decode() {
        // 0x73 = 115, so temp = 115 - 40 = 75°C
        let response = PidResponse::decode(Pid::CoolantTemp, vec![0x73], 0).unwrap();
        assert!((response.value - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_fuel_trim_decode() {
        let response = PidResponse::decode(Pid::ShortFuelTrim, vec![0x80], 0).unwrap();
        assert!(response.value.abs() < 0.01);

        // (144 - 128) * 100 / 128 = 12.5%
        let response = PidResponse::decode(Pid::LongFuelTrim, vec![0x90], 0).unwrap();
        assert!((response.value - 12.5).abs() < 0.01);
    }

    #[test]
    fn test_battery_voltage_decode() {
        // 0x3A98 = 15000 mV
        let response = PidResponse::decode(Pid::ControlModuleVoltage, vec![0x3A, 0x98], 0).unwrap();
        assert!((response.value - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_short_response_rejected() {
        assert!(PidResponse::decode(Pid::Rpm, vec![0x1A], 0).is_none());
        assert!(PidResponse::decode(Pid::Speed, vec![], 0).is_none());
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Pid::from_hex(0x0D), Some(Pid::Speed));
        assert_eq!(Pid::from_hex(0x10), None);
    }
}
