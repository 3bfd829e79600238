//! Setpoint Model - generator model service
//!
//! Loads a serialized conditional generator once at startup and exposes it
//! as an immutable, shareable service:
//! - `Generator`: the opaque forward-pass contract
//! - `DenseGenerator`: dense network exported from the trained model
//! - `load`: artifact parsing and one-time schema validation
//! - `Recommender`: reading → features → noise → prediction → labeled settings

#![deny(unsafe_code)]

pub mod artifact;
pub mod dense;
pub mod error;
pub mod generator;
pub mod noise;
pub mod recommender;

pub use artifact::{
    load, LoadedModel, ModelArtifact, ModelDescriptor, ARTIFACT_FORMAT, DEFAULT_LATENT_DIM,
    DEFAULT_PRECISION,
};
pub use dense::{Activation, DenseGenerator, DenseLayer, DenseNetwork};
pub use error::{ModelError, ModelResult};
pub use generator::{check_inputs, Generator};
pub use noise::{sample_noise, session_rng};
pub use recommender::Recommender;
