//! ELM327 command formatting and reply parsing

use crate::error::ObdError;
use crate::mode;
use crate::pid::Pid;

/// Prompt the adapter prints when it is ready for the next command
pub const PROMPT: u8 = b'>';

/// Reset, echo off, linefeeds off, spaces on, automatic protocol
pub const INIT_COMMANDS: [&str; 5] = ["ATZ", "ATE0", "ATL0", "ATS1", "ATSP0"];

/// Format a Mode 01 request, e.g. `010C\r`
pub fn pid_command(pid: Pid) -> String {
    format!("{:02X}{:02X}\r", mode::CURRENT_DATA, pid.as_hex())
}

/// Check the reply to an AT command
pub fn check_at_reply(command: &str, reply: &str) -> Result<(), ObdError> {
    if reply.trim().starts_with('?') {
        return Err(ObdError::InvalidResponse(format!(
            "adapter rejected {command}"
        )));
    }
    Ok(())
}

/// Extract the data bytes for `pid` from a raw adapter reply
///
/// Replies may carry `SEARCHING...` banners, multiple ECU lines and the
/// trailing prompt; the first line whose header matches `41 <pid>` wins.
pub fn parse_pid_reply(pid: Pid, reply: &str) -> Result<Vec<u8>, ObdError> {
    let upper = reply.to_ascii_uppercase();
    if upper.contains("NO DATA") {
        return Err(ObdError::PidNotSupported(pid.as_hex()));
    }
    if upper.contains("UNABLE TO CONNECT") || upper.contains("BUS INIT") {
        return Err(ObdError::VehicleNotConnected);
    }

    let header = format!(
        "{:02X}{:02X}",
        mode::CURRENT_DATA + mode::RESPONSE_OFFSET,
        pid.as_hex()
    );

    for line in upper.split(['\r', '\n']) {
        let compact: String = line
            .chars()
            .filter(|c| !c.is_whitespace() && *c != PROMPT as char)
            .collect();
        if let Some(data) = compact.strip_prefix(&header) {
            let bytes = decode_hex(data)?;
            if bytes.len() < pid.response_bytes() {
                return Err(ObdError::InvalidResponse(format!(
                    "PID {:02X} expected {} bytes, got {}",
                    pid.as_hex(),
                    pid.response_bytes(),
                    bytes.len()
                )));
            }
            return Ok(bytes[..pid.response_bytes()].to_vec());
        }
    }

    Err(ObdError::InvalidResponse(reply.trim().to_string()))
}

fn decode_hex(data: &str) -> Result<Vec<u8>, ObdError> {
    // Line noise arrives as U+FFFD after lossy decoding
    if !data.is_ascii() {
        return Err(ObdError::InvalidResponse(format!("non-ascii reply: {data}")));
    }
    if data.len() % 2 != 0 {
        return Err(ObdError::InvalidResponse(format!("odd hex length: {data}")));
    }
    data.as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| ObdError::InvalidResponse(format!("bad hex: {data}")))
        })
        .collect()
}
