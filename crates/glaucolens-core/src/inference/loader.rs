//! Model loading from safetensors weights.
//!
//! The classifier is loaded exactly once, at startup, and then shared
//! read-only for the rest of the process.

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::FundusClassifier;
use crate::domain::DetectionError;

/// Loads the fundus classifier from a safetensors file.
///
/// # Errors
///
/// Returns [`DetectionError::MissingArtifact`] if the file is missing, is not
/// valid safetensors, or lacks a parameter the network needs.
pub fn load_classifier(
    path: impl AsRef<Path>,
    device: &Device,
) -> Result<FundusClassifier, DetectionError> {
    let path = path.as_ref();
    info!("Loading fundus classifier from {}", path.display());

    load_safetensors(path, device)
        .and_then(|vb| FundusClassifier::new(vb).context("Weights do not match the classifier"))
        .map_err(|e| DetectionError::missing_artifact(path, &e))
}

/// Loads a safetensors file and creates a `VarBuilder` for the model.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The safetensors data is invalid
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();

    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;

    let tensors = SafeTensors::deserialize(&data)
        .with_context(|| format!("Failed to parse safetensors: {}", path.display()))?;

    let mut tensor_map: HashMap<String, Tensor> = HashMap::new();

    for name in tensors.names() {
        let view = tensors
            .tensor(name)
            .with_context(|| format!("Failed to get tensor '{name}'"))?;

        let dtype = safetensors_dtype_to_candle(view.dtype())?;
        let tensor = Tensor::from_raw_buffer(view.data(), dtype, view.shape(), device)
            .with_context(|| format!("Failed to create tensor '{name}'"))?
            .to_dtype(DType::F32)
            .with_context(|| format!("Failed to convert tensor '{name}' to f32"))?;

        debug!("Loaded tensor {name} {:?}", view.shape());
        tensor_map.insert(name.clone(), tensor);
    }

    Ok(VarBuilder::from_tensors(tensor_map, DType::F32, device))
}

/// Converts safetensors dtype to candle dtype.
///
/// Only floating-point weights make sense for the classifier.
fn safetensors_dtype_to_candle(dtype: safetensors::Dtype) -> Result<DType> {
    use safetensors::Dtype as S;
    match dtype {
        S::F32 => Ok(DType::F32),
        S::F64 => Ok(DType::F64),
        S::F16 => Ok(DType::F16),
        S::BF16 => Ok(DType::BF16),
        other => anyhow::bail!("Unsupported weight dtype: {other:?}"),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::inference::PARAMETER_SHAPES;
    use crate::ports::ScoreModel;
    use safetensors::tensor::TensorView;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tensors(tensors: &[(&str, Vec<usize>, Vec<f32>)]) -> NamedTempFile {
        let views: HashMap<String, TensorView<'_>> = tensors
            .iter()
            .map(|(name, shape, data)| {
                let bytes: &[u8] = bytemuck::cast_slice(data);
                let view = TensorView::new(safetensors::Dtype::F32, shape.clone(), bytes)
                    .expect("valid tensor view");
                ((*name).to_string(), view)
            })
            .collect();
        let serialized = safetensors::serialize(&views, &None).expect("serialize");

        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&serialized).expect("write");
        file
    }

    #[test]
    fn test_load_safetensors() {
        let file = write_tensors(&[("test_tensor", vec![2, 2], vec![1.0, 2.0, 3.0, 4.0])]);
        assert!(load_safetensors(file.path(), &Device::Cpu).is_ok());
    }

    #[test]
    fn test_load_safetensors_missing_file() {
        let result = load_safetensors("/nonexistent/path.safetensors", &Device::Cpu);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_classifier_missing_file_is_missing_artifact() {
        let result = load_classifier("/nonexistent/glaucoma.safetensors", &Device::Cpu);
        assert!(matches!(
            result,
            Err(DetectionError::MissingArtifact { ref path, .. })
                if path.ends_with("glaucoma.safetensors")
        ));
    }

    #[test]
    fn test_load_classifier_corrupt_file_is_missing_artifact() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"definitely not safetensors").expect("write");
        let result = load_classifier(file.path(), &Device::Cpu);
        assert!(matches!(result, Err(DetectionError::MissingArtifact { .. })));
    }

    #[test]
    fn test_load_classifier_wrong_weights_is_missing_artifact() {
        let file = write_tensors(&[("conv1.weight", vec![2], vec![0.0, 0.0])]);
        let result = load_classifier(file.path(), &Device::Cpu);
        assert!(matches!(result, Err(DetectionError::MissingArtifact { .. })));
    }

    #[test]
    fn test_load_classifier_and_predict() {
        let tensors: Vec<(&str, Vec<usize>, Vec<f32>)> = PARAMETER_SHAPES
            .iter()
            .map(|(name, shape)| {
                let len = shape.iter().product();
                let fill = if *name == "fc2.bias" { -1.5 } else { 0.0 };
                (*name, shape.to_vec(), vec![fill; len])
            })
            .collect();
        let file = write_tensors(&tensors);

        let model = load_classifier(file.path(), &Device::Cpu).expect("load classifier");
        let input = crate::inference::preprocess(&image::DynamicImage::new_luma8(30, 30))
            .expect("preprocess");
        let score = model.predict(&input).expect("predict");

        let expected = 1.0 / (1.0 + 1.5f32.exp());
        assert!((score - expected).abs() < 1e-6);
    }
}
