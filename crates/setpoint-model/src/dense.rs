//! Dense feed-forward generator
//!
//! Weights use the Keras `Dense` kernel layout (`[inputs][outputs]`) so a
//! trained generator can be exported layer by layer without transposing.
//! The network input is `concat(noise, features)`.

use crate::error::{ModelError, ModelResult};
use crate::generator::{check_inputs, Generator};
use serde::{Deserialize, Serialize};

/// Layer activation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    LeakyRelu {
        #[serde(default = "default_leak")]
        alpha: f32,
    },
    Tanh,
    Sigmoid,
}

fn default_leak() -> f32 {
    0.2
}

impl Activation {
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::LeakyRelu { alpha } => {
                if x >= 0.0 {
                    x
                } else {
                    alpha * x
                }
            }
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

/// A fully connected layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Kernel, `weights[input][output]`
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    /// Build a layer, checking the kernel is rectangular and matches the bias
    pub fn new(
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
        activation: Activation,
    ) -> ModelResult<Self> {
        let layer = Self {
            weights,
            bias,
            activation,
        };
        layer.validate()?;
        Ok(layer)
    }

    pub fn input_dim(&self) -> usize {
        self.weights.len()
    }

    pub fn output_dim(&self) -> usize {
        self.bias.len()
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.weights.is_empty() || self.bias.is_empty() {
            return Err(ModelError::Shape("layer has no weights".to_string()));
        }
        for (row, weights) in self.weights.iter().enumerate() {
            if weights.len() != self.bias.len() {
                return Err(ModelError::Shape(format!(
                    "kernel row {} has {} columns, bias has {}",
                    row,
                    weights.len(),
                    self.bias.len()
                )));
            }
        }
        Ok(())
    }

    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut output = self.bias.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            for (acc, w) in output.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        for value in &mut output {
            *value = self.activation.apply(*value);
        }
        output
    }
}

/// Stack of dense layers
#[derive(Debug, Clone, PartialEq)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub fn new(layers: Vec<DenseLayer>) -> ModelResult<Self> {
        if layers.is_empty() {
            return Err(ModelError::Shape("network has no layers".to_string()));
        }
        for layer in &layers {
            layer.validate()?;
        }
        for (index, pair) in layers.windows(2).enumerate() {
            if pair[0].output_dim() != pair[1].input_dim() {
                return Err(ModelError::Shape(format!(
                    "layer {} outputs {} values but layer {} takes {}",
                    index,
                    pair[0].output_dim(),
                    index + 1,
                    pair[1].input_dim()
                )));
            }
        }
        Ok(Self { layers })
    }

    pub fn input_dim(&self) -> usize {
        self.layers[0].input_dim()
    }

    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].output_dim()
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut activations = input.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }
        activations
    }
}

/// Conditional generator backed by a dense network
#[derive(Debug, Clone)]
pub struct DenseGenerator {
    latent_dim: usize,
    feature_dim: usize,
    network: DenseNetwork,
}

impl DenseGenerator {
    pub fn new(latent_dim: usize, feature_dim: usize, network: DenseNetwork) -> ModelResult<Self> {
        if latent_dim + feature_dim != network.input_dim() {
            return Err(ModelError::Shape(format!(
                "first layer takes {} inputs, expected latent {} + features {}",
                network.input_dim(),
                latent_dim,
                feature_dim
            )));
        }
        Ok(Self {
            latent_dim,
            feature_dim,
            network,
        })
    }

    pub fn network(&self) -> &DenseNetwork {
        &self.network
    }
}

impl Generator for DenseGenerator {
    fn latent_dim(&self) -> usize {
        self.latent_dim
    }

    fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    fn output_dim(&self) -> usize {
        self.network.output_dim()
    }

    fn predict(&self, noise: &[f32], features: &[f32]) -> ModelResult<Vec<f32>> {
        check_inputs(self, noise, features)?;

        let mut input = Vec::with_capacity(self.latent_dim + self.feature_dim);
        input.extend_from_slice(noise);
        input.extend_from_slice(features);

        let output = self.network.forward(&input);
        if let Some(position) = output.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite(position));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(width: usize) -> Vec<Vec<f32>> {
        (0..width)
            .map(|i| (0..width).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect()
    }

    #[test]
    fn test_activations() {
        assert_eq!(Activation::Linear.apply(-2.0), -2.0);
        assert_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_eq!(Activation::LeakyRelu { alpha: 0.1 }.apply(-2.0), -0.2);
        assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
        assert_eq!(Activation::Tanh.apply(0.0), 0.0);
    }

    #[test]
    fn test_activation_deserialize() {
        let relu: Activation = serde_json::from_str("\"relu\"").unwrap();
        assert_eq!(relu, Activation::Relu);

        let leaky: Activation = serde_json::from_str(r#"{"leaky_relu": {}}"#).unwrap();
        assert_eq!(leaky, Activation::LeakyRelu { alpha: 0.2 });
    }

    #[test]
    fn test_layer_forward() {
        // 2 inputs -> 1 output: y = 2*x0 + 3*x1 + 1
        let layer = DenseLayer::new(vec![vec![2.0], vec![3.0]], vec![1.0], Activation::Linear)
            .unwrap();
        assert_eq!(layer.forward(&[1.0, 1.0]), vec![6.0]);
    }

    #[test]
    fn test_ragged_kernel_rejected() {
        let err = DenseLayer::new(vec![vec![1.0, 2.0], vec![1.0]], vec![0.0, 0.0], Activation::Relu)
            .unwrap_err();
        assert!(matches!(err, ModelError::Shape(_)));
    }

    #[test]
    fn test_network_chain_checked() {
        let a = DenseLayer::new(identity(3), vec![0.0; 3], Activation::Linear).unwrap();
        let b = DenseLayer::new(identity(2), vec![0.0; 2], Activation::Linear).unwrap();
        assert!(matches!(
            DenseNetwork::new(vec![a, b]),
            Err(ModelError::Shape(_))
        ));
        assert!(matches!(DenseNetwork::new(vec![]), Err(ModelError::Shape(_))));
    }

    #[test]
    fn test_generator_concatenates_noise_then_features() {
        let network =
            DenseNetwork::new(vec![DenseLayer::new(identity(3), vec![0.0; 3], Activation::Linear)
                .unwrap()])
            .unwrap();
        let generator = DenseGenerator::new(1, 2, network).unwrap();

        let output = generator.predict(&[0.5], &[0.1, 0.2]).unwrap();
        assert_eq!(output, vec![0.5, 0.1, 0.2]);
    }

    #[test]
    fn test_generator_rejects_wrong_widths() {
        let network =
            DenseNetwork::new(vec![DenseLayer::new(identity(3), vec![0.0; 3], Activation::Linear)
                .unwrap()])
            .unwrap();
        let generator = DenseGenerator::new(1, 2, network).unwrap();

        let err = generator.predict(&[0.5, 0.5], &[0.1, 0.2]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InputShape {
                name: "noise",
                expected: 1,
                actual: 2
            }
        ));

        let err = generator.predict(&[0.5], &[0.1]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InputShape {
                name: "features",
                ..
            }
        ));
    }

    #[test]
    fn test_generator_width_must_match_network() {
        let network =
            DenseNetwork::new(vec![DenseLayer::new(identity(3), vec![0.0; 3], Activation::Linear)
                .unwrap()])
            .unwrap();
        assert!(DenseGenerator::new(8, 23, network).is_err());
    }

    #[test]
    fn test_non_finite_output_rejected() {
        let layer = DenseLayer::new(vec![vec![f32::MAX], vec![f32::MAX]], vec![0.0], Activation::Linear)
            .unwrap();
        let generator =
            DenseGenerator::new(1, 1, DenseNetwork::new(vec![layer]).unwrap()).unwrap();
        let err = generator.predict(&[f32::MAX], &[f32::MAX]).unwrap_err();
        assert!(matches!(err, ModelError::NonFinite(0)));
    }
}
