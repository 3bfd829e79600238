//! Per-reading recommendation pipeline
//!
//! normalize → sample noise → predict → de-normalize, round, label.

use crate::artifact::LoadedModel;
use crate::error::{ModelError, ModelResult};
use crate::generator::Generator;
use crate::noise::sample_noise;
use rand::Rng;
use setpoint_types::{
    round_to, InferenceResponse, OutputSchema, RecommendedSettings, SensorReading, DEFAULT_SCALE,
};

/// Turns readings into recommended settings using a shared model
#[derive(Debug, Clone)]
pub struct Recommender {
    model: LoadedModel,
    scale: f64,
}

impl Recommender {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            model,
            scale: DEFAULT_SCALE,
        }
    }

    /// Use a scale other than 100
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    pub fn schema(&self) -> &OutputSchema {
        self.model.schema()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Normalized feature vector in training order
    pub fn features(&self, reading: &SensorReading) -> Vec<f32> {
        reading.normalized(self.scale)
    }

    /// Run one reading with fresh noise drawn from `rng`
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        reading: &SensorReading,
        rng: &mut R,
    ) -> ModelResult<InferenceResponse> {
        let noise = sample_noise(rng, self.model.generator().latent_dim());
        self.recommend_with_noise(reading, &noise)
    }

    /// Run one reading with caller-supplied noise
    pub fn recommend_with_noise(
        &self,
        reading: &SensorReading,
        noise: &[f32],
    ) -> ModelResult<InferenceResponse> {
        let features = self.features(reading);
        let raw_values = self.model.generator().predict(noise, &features)?;
        let recommended_settings = self.label(&raw_values)?;

        Ok(InferenceResponse {
            recommended_settings,
            raw_values,
        })
    }

    /// De-normalize, round and name raw model output
    pub fn label(&self, raw_values: &[f32]) -> ModelResult<RecommendedSettings> {
        let schema = self.schema();
        if raw_values.len() != schema.len() {
            return Err(ModelError::OutputShape {
                expected: schema.len(),
                actual: raw_values.len(),
            });
        }

        let precision = schema.precision();
        Ok(schema
            .names()
            .iter()
            .zip(raw_values)
            .map(|(name, raw)| {
                (
                    name.clone(),
                    round_to(f64::from(*raw) * self.scale, precision),
                )
            })
            .collect())
    }
}
