//! Output schema
//!
//! An OutputSchema names each position of the generator's output vector.
//! It is bound to the model once at load time so labeling never relies on
//! an unchecked positional zip.

use crate::sensor::SENSOR_FIELDS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Largest supported rounding precision
pub const MAX_PRECISION: u32 = 6;

/// Schema construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("output schema has no names")]
    Empty,

    #[error("duplicate output name: {0}")]
    Duplicate(String),

    #[error("output name at position {0} is blank")]
    BlankName(usize),

    #[error("precision {0} exceeds maximum of {MAX_PRECISION}")]
    Precision(u32),

    #[error("schema names {schema} outputs but the model produces {model}")]
    WidthMismatch { schema: usize, model: usize },
}

/// Ordered setpoint names and the decimal precision used when reporting them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema", into = "RawSchema")]
pub struct OutputSchema {
    names: Vec<String>,
    precision: u32,
}

#[derive(Serialize, Deserialize)]
struct RawSchema {
    names: Vec<String>,
    precision: u32,
}

impl TryFrom<RawSchema> for OutputSchema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        OutputSchema::new(raw.names, raw.precision)
    }
}

impl From<OutputSchema> for RawSchema {
    fn from(schema: OutputSchema) -> Self {
        RawSchema {
            names: schema.names,
            precision: schema.precision,
        }
    }
}

impl OutputSchema {
    /// Validate and build a schema
    pub fn new<I, S>(names: I, precision: u32) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(SchemaError::Empty);
        }
        if precision > MAX_PRECISION {
            return Err(SchemaError::Precision(precision));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::BlankName(position));
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        Ok(Self { names, precision })
    }

    /// The earlier 23-output revision: one setpoint per sensor field,
    /// reported as whole numbers
    pub fn legacy() -> Self {
        Self {
            names: SENSOR_FIELDS.iter().map(|name| name.to_string()).collect(),
            precision: 0,
        }
    }

    /// Same names with a different precision
    pub fn with_precision(self, precision: u32) -> Result<Self, SchemaError> {
        Self::new(self.names, precision)
    }

    /// Check that this schema labels exactly `model_width` outputs
    pub fn bind(&self, model_width: usize) -> Result<(), SchemaError> {
        if self.names.len() != model_width {
            return Err(SchemaError::WidthMismatch {
                schema: self.names.len(),
                model: model_width,
            });
        }
        Ok(())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_schema() {
        let schema = OutputSchema::legacy();
        assert_eq!(schema.len(), 23);
        assert_eq!(schema.precision(), 0);
        assert_eq!(schema.names()[0], "part");
        assert_eq!(schema.names()[22], "tfe_vacuum_pressure_pv");
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert_eq!(
            OutputSchema::new(Vec::<String>::new(), 2),
            Err(SchemaError::Empty)
        );
        assert_eq!(
            OutputSchema::new(["a", "b", "a"], 2),
            Err(SchemaError::Duplicate("a".to_string()))
        );
        assert_eq!(
            OutputSchema::new(["a", " "], 2),
            Err(SchemaError::BlankName(1))
        );
    }

    #[test]
    fn test_rejects_excess_precision() {
        assert_eq!(
            OutputSchema::new(["a"], 7),
            Err(SchemaError::Precision(7))
        );
    }

    #[test]
    fn test_bind_checks_width() {
        let schema = OutputSchema::new(["a", "b"], 2).unwrap();
        assert!(schema.bind(2).is_ok());
        assert_eq!(
            schema.bind(3),
            Err(SchemaError::WidthMismatch {
                schema: 2,
                model: 3
            })
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let err = serde_json::from_str::<OutputSchema>(r#"{"names":["x","x"],"precision":2}"#)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate output name"));

        let schema: OutputSchema =
            serde_json::from_str(r#"{"names":["x","y"],"precision":2}"#).unwrap();
        assert_eq!(schema.names(), ["x".to_string(), "y".to_string()]);
    }
}
