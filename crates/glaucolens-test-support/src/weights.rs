//! Classifier weight files with a known, constant output.
//!
//! All weights are zero except the final bias, so the network's logit equals
//! that bias for every input. Useful for end-to-end tests that need a real
//! safetensors file on disk.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use glaucolens_core::inference::PARAMETER_SHAPES;
use safetensors::tensor::TensorView;

/// Logit whose sigmoid is `score`.
///
/// `score` is clamped into `(0, 1)` so the result is finite.
#[must_use]
pub fn logit_for_score(score: f32) -> f32 {
    let p = score.clamp(1e-6, 1.0 - 1e-6);
    (p / (1.0 - p)).ln()
}

/// Serializes classifier weights whose output is always `sigmoid(logit)`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn constant_classifier_bytes(logit: f32) -> Result<Vec<u8>> {
    let buffers: Vec<(&str, &[usize], Vec<f32>)> = PARAMETER_SHAPES
        .iter()
        .map(|(name, shape)| {
            let len = shape.iter().product();
            let fill = if *name == "fc2.bias" { logit } else { 0.0 };
            (*name, *shape, vec![fill; len])
        })
        .collect();

    let mut views = HashMap::new();
    for (name, shape, data) in &buffers {
        let view = TensorView::new(
            safetensors::Dtype::F32,
            shape.to_vec(),
            bytemuck::cast_slice(data),
        )
        .with_context(|| format!("Invalid tensor view for {name}"))?;
        views.insert((*name).to_string(), view);
    }

    safetensors::serialize(&views, &None).context("Failed to serialize classifier weights")
}

/// Writes a constant-output classifier to `path`.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_constant_classifier(path: impl AsRef<Path>, score: f32) -> Result<()> {
    let path = path.as_ref();
    let bytes = constant_classifier_bytes(logit_for_score(score))?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
