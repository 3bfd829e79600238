//! Error types for the model service

use setpoint_types::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Model loading and inference errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact could not be read
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not valid JSON for the expected format
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Unknown artifact format tag
    #[error("unsupported model format: {0}")]
    Format(String),

    /// Layer dimensions do not chain
    #[error("invalid layer shape: {0}")]
    Shape(String),

    /// Artifact input names differ from the sensor field order
    #[error("model inputs do not match sensor fields: {0}")]
    InputSchema(String),

    /// Output schema does not fit the model
    #[error("output schema error: {0}")]
    OutputSchema(#[from] SchemaError),

    /// Caller passed a vector of the wrong width
    #[error("{name} has width {actual}, model expects {expected}")]
    InputShape {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Generator returned a different number of values than the schema names
    #[error("model returned {actual} values, output schema names {expected}")]
    OutputShape { expected: usize, actual: usize },

    /// Forward pass produced NaN or infinity
    #[error("model produced a non-finite value at output {0}")]
    NonFinite(usize),
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
