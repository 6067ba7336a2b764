//! Fundus classifier network.
//!
//! A small CNN binary classifier over 100x100 RGB fundus photographs. The
//! output is the probability that the eye is healthy.

use anyhow::{Context, Result};
use candle_core::{Device, Module, Tensor};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, VarBuilder};

use super::preprocess::{NormalizedTensor, INPUT_SHAPE};
use crate::ports::ScoreModel;

/// Width of the flattened feature map after three 2x2 max pools.
///
/// 100x100 -> 50x50 -> 25x25 -> 12x12, times 128 channels.
pub const FLATTENED_FEATURES: usize = 128 * 12 * 12;

/// Hidden units in the first fully connected layer.
pub const HIDDEN_UNITS: usize = 256;

/// Every parameter the weights file must provide, with its shape.
pub const PARAMETER_SHAPES: &[(&str, &[usize])] = &[
    ("conv1.weight", &[32, 3, 3, 3]),
    ("conv1.bias", &[32]),
    ("conv2.weight", &[64, 32, 3, 3]),
    ("conv2.bias", &[64]),
    ("conv3.weight", &[128, 64, 3, 3]),
    ("conv3.bias", &[128]),
    ("fc1.weight", &[HIDDEN_UNITS, FLATTENED_FEATURES]),
    ("fc1.bias", &[HIDDEN_UNITS]),
    ("fc2.weight", &[1, HIDDEN_UNITS]),
    ("fc2.bias", &[1]),
];

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Glaucoma screening classifier.
///
/// Architecture: 3 conv layers (3x3, same padding) each followed by ReLU and
/// 2x2 max pooling, then 2 FC layers.
/// Input: `(1, 100, 100, 3)` NHWC tensor in `[0, 1]`
/// Output: probability of a healthy eye
pub struct FundusClassifier {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl FundusClassifier {
    /// Creates the classifier from weights.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is missing or has the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();
        let same = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };

        let conv1 = conv2d(3, 32, 3, same, vb.pp("conv1")).context("conv1")?;
        let conv2 = conv2d(32, 64, 3, same, vb.pp("conv2")).context("conv2")?;
        let conv3 = conv2d(64, 128, 3, same, vb.pp("conv3")).context("conv3")?;
        let fc1 = linear(FLATTENED_FEATURES, HIDDEN_UNITS, vb.pp("fc1")).context("fc1")?;
        let fc2 = linear(HIDDEN_UNITS, 1, vb.pp("fc2")).context("fc2")?;

        Ok(Self {
            conv1,
            conv2,
            conv3,
            fc1,
            fc2,
            device,
        })
    }

    /// Moves a normalized tensor onto this model's device.
    ///
    /// # Errors
    ///
    /// Returns an error if tensor creation fails.
    pub fn to_input(&self, input: &NormalizedTensor) -> Result<Tensor> {
        let [n, h, w, c] = INPUT_SHAPE;
        Tensor::from_slice(input.as_slice(), (n, h, w, c), &self.device)
            .context("Failed to create fundus tensor")
    }

    /// Runs the network on an NHWC input and returns the healthy probability.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    pub fn classify(&self, x: &Tensor) -> Result<f32> {
        let logit = self
            .forward(x)?
            .squeeze(0)?
            .squeeze(0)?
            .to_scalar::<f32>()?;
        Ok(sigmoid(logit))
    }
}

impl Module for FundusClassifier {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        // NHWC -> NCHW
        let x = x.permute((0, 3, 1, 2))?.contiguous()?;

        let x = self.conv1.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv2.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv3.forward(&x)?.relu()?.max_pool2d(2)?;

        let x = x.flatten_from(1)?;
        let x = self.fc1.forward(&x)?.relu()?;

        // Logit
        self.fc2.forward(&x)
    }
}

impl ScoreModel for FundusClassifier {
    fn predict(&self, input: &NormalizedTensor) -> Result<f32> {
        let x = self.to_input(input)?;
        self.classify(&x).context("Fundus classifier forward pass failed")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use candle_core::DType;
    use std::collections::HashMap;

    fn constant_classifier(logit: f32) -> FundusClassifier {
        let device = Device::Cpu;
        let mut tensors = HashMap::new();
        for (name, shape) in PARAMETER_SHAPES {
            let t = if *name == "fc2.bias" {
                Tensor::new(&[logit], &device).unwrap()
            } else {
                Tensor::zeros(*shape, DType::F32, &device).unwrap()
            };
            tensors.insert((*name).to_string(), t);
        }
        FundusClassifier::new(VarBuilder::from_tensors(tensors, DType::F32, &device)).unwrap()
    }

    #[test]
    fn test_feature_map_size() {
        assert_eq!(100 / 2 / 2 / 2, 12);
        assert_eq!(FLATTENED_FEATURES, 18_432);
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn test_constant_model_scores_bias() {
        let model = constant_classifier(2.0);
        let input = crate::inference::preprocess(&image::DynamicImage::new_rgb8(64, 48)).unwrap();
        let score = model.predict(&input).unwrap();
        assert!((score - sigmoid(2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_missing_parameter_fails() {
        let device = Device::Cpu;
        let tensors: HashMap<String, Tensor> = HashMap::new();
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);
        assert!(FundusClassifier::new(vb).is_err());
    }
}
