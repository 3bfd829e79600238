//! The generator contract
//!
//! A generator maps (noise, conditioning features) to a vector of
//! normalized setpoints. Everything behind this trait is opaque to the
//! rest of the service.

use crate::error::{ModelError, ModelResult};

/// Conditional generator model.
///
/// Implementations are immutable after construction and shared read-only
/// across all connections.
pub trait Generator: Send + Sync {
    /// Width of the noise vector
    fn latent_dim(&self) -> usize;

    /// Width of the conditioning feature vector
    fn feature_dim(&self) -> usize;

    /// Width of the output vector
    fn output_dim(&self) -> usize;

    /// Forward pass. Deterministic for fixed inputs.
    fn predict(&self, noise: &[f32], features: &[f32]) -> ModelResult<Vec<f32>>;
}

/// Reject inputs whose widths do not match the generator
pub fn check_inputs<G: Generator + ?Sized>(
    generator: &G,
    noise: &[f32],
    features: &[f32],
) -> ModelResult<()> {
    if noise.len() != generator.latent_dim() {
        return Err(ModelError::InputShape {
            name: "noise",
            expected: generator.latent_dim(),
            actual: noise.len(),
        });
    }
    if features.len() != generator.feature_dim() {
        return Err(ModelError::InputShape {
            name: "features",
            expected: generator.feature_dim(),
            actual: features.len(),
        });
    }
    Ok(())
}
