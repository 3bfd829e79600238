//! Setpoint Types - Wire and domain types for setpoint recommendation
//!
//! The setpoint service feeds live evaporator readings to a pre-trained
//! conditional generator and returns recommended process-control setpoints.
//! This crate holds everything that crosses the wire or the model boundary,
//! with no I/O of its own.
//!
//! ## Key Concepts
//!
//! - **SensorReading**: the 23 process measurements, in training order
//! - **OutputSchema**: ordered setpoint names bound to the model's output layout
//! - **RecommendedSettings**: labeled, de-normalized model output
//! - **InferenceResponse**: the outbound message sent for every reading
//! - **ProtocolMode**: whether bad input tears down the connection or not

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod protocol;
pub mod schema;
pub mod sensor;
pub mod settings;

pub use protocol::{
    parse_reading, ProtocolError, ProtocolMode, CLOSE_INTERNAL_ERROR, HANDSHAKE_REPLY,
    HANDSHAKE_REQUEST,
};
pub use schema::{OutputSchema, SchemaError, MAX_PRECISION};
pub use sensor::{SensorReading, DEFAULT_SCALE, SENSOR_FIELDS, SENSOR_WIDTH};
pub use settings::{round_to, InferenceResponse, RecommendedSettings};
