//! Serialized generator artifacts
//!
//! An artifact is a JSON export of a trained generator:
//!
//! ```json
//! {
//!   "format": "setpoint-generator/v1",
//!   "latent_dim": 8,
//!   "inputs": ["part", "extract_tank_level", "..."],
//!   "outputs": ["ffte_feed_flow_rate_sp", "..."],
//!   "precision": 2,
//!   "layers": [
//!     { "weights": [[0.1, 0.2]], "bias": [0.0, 0.0], "activation": "relu" }
//!   ]
//! }
//! ```
//!
//! Input names are checked against the sensor field order and the output
//! schema against the final layer once, at load time.

use crate::dense::{DenseGenerator, DenseLayer, DenseNetwork};
use crate::error::{ModelError, ModelResult};
use crate::generator::Generator;
use serde::{Deserialize, Serialize};
use setpoint_types::{OutputSchema, SENSOR_FIELDS, SENSOR_WIDTH};
use std::path::Path;
use std::sync::Arc;

/// Format tag accepted by `load`
pub const ARTIFACT_FORMAT: &str = "setpoint-generator/v1";

/// Noise width of the production generator
pub const DEFAULT_LATENT_DIM: usize = 8;

/// Precision used when an artifact names its outputs but not a precision
pub const DEFAULT_PRECISION: u32 = 2;

/// On-disk generator description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: String,

    #[serde(default = "default_latent_dim")]
    pub latent_dim: usize,

    /// Conditioning feature names, in the order the model was trained on
    pub inputs: Vec<String>,

    /// Output names in model output order; absent means the legacy schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    pub layers: Vec<DenseLayer>,
}

fn default_latent_dim() -> usize {
    DEFAULT_LATENT_DIM
}

impl ModelArtifact {
    /// Output schema described by this artifact
    pub fn schema(&self) -> ModelResult<OutputSchema> {
        let schema = match &self.outputs {
            Some(names) => OutputSchema::new(
                names.iter().cloned(),
                self.precision.unwrap_or(DEFAULT_PRECISION),
            )?,
            None => match self.precision {
                Some(precision) => OutputSchema::legacy().with_precision(precision)?,
                None => OutputSchema::legacy(),
            },
        };
        Ok(schema)
    }

    /// Validate the artifact and build the shared model
    pub fn into_model(self) -> ModelResult<LoadedModel> {
        if self.format != ARTIFACT_FORMAT {
            return Err(ModelError::Format(self.format));
        }
        check_input_names(&self.inputs)?;

        let schema = self.schema()?;
        let network = DenseNetwork::new(self.layers)?;
        let generator = DenseGenerator::new(self.latent_dim, self.inputs.len(), network)?;

        LoadedModel::new(Arc::new(generator), schema)
    }
}

fn check_input_names(inputs: &[String]) -> ModelResult<()> {
    if inputs.len() != SENSOR_WIDTH {
        return Err(ModelError::InputSchema(format!(
            "artifact lists {} inputs, readings carry {}",
            inputs.len(),
            SENSOR_WIDTH
        )));
    }
    for (position, (actual, expected)) in inputs.iter().zip(SENSOR_FIELDS).enumerate() {
        if actual != expected {
            return Err(ModelError::InputSchema(format!(
                "position {} is '{}', expected '{}'",
                position, actual, expected
            )));
        }
    }
    Ok(())
}

/// Read, validate and build a generator from an artifact file
pub fn load(path: impl AsRef<Path>) -> ModelResult<LoadedModel> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ModelArtifact = serde_json::from_str(&raw)?;
    let model = artifact.into_model()?;

    tracing::info!(
        path = %path.display(),
        latent_dim = model.generator().latent_dim(),
        outputs = model.schema().len(),
        precision = model.schema().precision(),
        "Loaded generator model"
    );

    Ok(model)
}

/// A generator bound to its output schema. Immutable once built.
#[derive(Clone)]
pub struct LoadedModel {
    generator: Arc<dyn Generator>,
    schema: OutputSchema,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("latent_dim", &self.generator.latent_dim())
            .field("feature_dim", &self.generator.feature_dim())
            .field("output_dim", &self.generator.output_dim())
            .field("schema", &self.schema)
            .finish()
    }
}

impl LoadedModel {
    /// Bind a generator to a schema, checking both ends of the model
    pub fn new(generator: Arc<dyn Generator>, schema: OutputSchema) -> ModelResult<Self> {
        if generator.feature_dim() != SENSOR_WIDTH {
            return Err(ModelError::InputSchema(format!(
                "generator takes {} features, readings carry {}",
                generator.feature_dim(),
                SENSOR_WIDTH
            )));
        }
        schema.bind(generator.output_dim())?;
        Ok(Self { generator, schema })
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// Replace the reporting precision, keeping the names
    pub fn with_precision(self, precision: u32) -> ModelResult<Self> {
        let schema = self.schema.with_precision(precision)?;
        Ok(Self {
            generator: self.generator,
            schema,
        })
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            latent_dim: self.generator.latent_dim(),
            inputs: SENSOR_FIELDS.iter().map(|name| name.to_string()).collect(),
            outputs: self.schema.names().to_vec(),
            precision: self.schema.precision(),
        }
    }
}

/// Summary of a loaded model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub latent_dim: usize,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub precision: u32,
}
