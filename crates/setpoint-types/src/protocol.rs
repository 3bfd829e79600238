//! Connection protocol
//!
//! Two behaviours exist for a connection that receives bad input:
//! - `Resilient` replies with an inline error string and keeps the session
//! - `Strict` closes the connection with code 1011

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Liveness check sent by clients in resilient mode
pub const HANDSHAKE_REQUEST: &str = "Hello";

/// Reply to `HANDSHAKE_REQUEST`
pub const HANDSHAKE_REPLY: &str = "Hello back!";

/// Close code used when a strict session fails (internal error)
pub const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// How a connection treats per-message failures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolMode {
    /// Handshake supported; failures are reported inline and the session continues
    #[default]
    Resilient,

    /// No handshake; any failure closes the connection with code 1011
    Strict,
}

impl ProtocolMode {
    /// Whether the literal handshake is answered before JSON parsing
    pub fn answers_handshake(self) -> bool {
        matches!(self, ProtocolMode::Resilient)
    }

    /// Whether a failed message ends the session
    pub fn closes_on_error(self) -> bool {
        matches!(self, ProtocolMode::Strict)
    }
}

impl std::fmt::Display for ProtocolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolMode::Resilient => write!(f, "resilient"),
            ProtocolMode::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for ProtocolMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resilient" => Ok(ProtocolMode::Resilient),
            "strict" => Ok(ProtocolMode::Strict),
            other => Err(format!("Unknown protocol mode: {}", other)),
        }
    }
}

/// Per-message failure. The display text is what a resilient session sends
/// back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Payload is not JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Payload is JSON but not a valid reading
    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    /// Model rejected the input
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Response could not be encoded
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

impl ProtocolError {
    /// Short reason suitable for a close frame
    pub fn close_reason(&self) -> &'static str {
        match self {
            ProtocolError::InvalidJson(_) => "invalid json",
            ProtocolError::InvalidReading(_) => "invalid reading",
            ProtocolError::Inference(_) => "inference failed",
            ProtocolError::Encoding(_) => "encoding failed",
        }
    }
}

/// Decode an inbound payload into a reading.
///
/// Syntax errors are reported separately from schema errors so clients
/// can tell a broken frame from a wrong field set.
pub fn parse_reading(payload: &str) -> Result<crate::SensorReading, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;

    if !value.is_object() {
        return Err(ProtocolError::InvalidReading(
            "expected a JSON object of sensor fields".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::InvalidReading(e.to_string()))
}
