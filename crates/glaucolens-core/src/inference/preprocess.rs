//! Fundus image normalization.
//!
//! Every image reaching the classifier goes through [`preprocess`], which is
//! the only way to obtain a [`NormalizedTensor`].

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::domain::DetectionError;

/// Side length of the square model input, in pixels.
pub const INPUT_SIZE: u32 = 100;
/// Color channels of the model input.
pub const INPUT_CHANNELS: usize = 3;
/// Model input shape, NHWC with a batch of one.
pub const INPUT_SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, INPUT_CHANNELS];

/// Resampling filter used when fitting images to [`INPUT_SIZE`].
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

const INPUT_LEN: usize = INPUT_SHAPE[0] * INPUT_SHAPE[1] * INPUT_SHAPE[2] * INPUT_SHAPE[3];

/// A `(1, 100, 100, 3)` RGB tensor with values in `[0, 1]`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Vec<f32>,
}

impl NormalizedTensor {
    /// Tensor shape, always [`INPUT_SHAPE`].
    #[must_use]
    pub const fn shape(&self) -> [usize; 4] {
        INPUT_SHAPE
    }

    /// Flat view of the values in NHWC order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// RGB values of the pixel at row `y`, column `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside `0..100`.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        assert!(x < INPUT_SHAPE[2] && y < INPUT_SHAPE[1], "pixel out of bounds");
        let offset = (y * INPUT_SHAPE[2] + x) * INPUT_CHANNELS;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }
}

/// Center-crops `image` to a square and resamples it to the model input size.
///
/// The crop happens before the resize, so the work is bounded by the source
/// image and the 100x100 output regardless of aspect ratio.
///
/// # Errors
///
/// Returns [`DetectionError::UnsupportedImage`] if the image has no pixels.
pub fn fit_to_input(image: &DynamicImage) -> Result<DynamicImage, DetectionError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectionError::unsupported(format!(
            "image has no pixels ({width}x{height})"
        )));
    }

    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    Ok(image
        .crop_imm(x, y, side, side)
        .resize_exact(INPUT_SIZE, INPUT_SIZE, RESAMPLE_FILTER))
}

/// Normalizes an arbitrary image into the classifier's input tensor.
///
/// Steps:
/// 1. Center-crop to a square, then resample to 100x100 (no stretching).
/// 2. Drop alpha / expand grayscale to RGB.
/// 3. Map `0..=255` to `0.0..=1.0`.
///
/// The output is deterministic for a given input image.
///
/// # Errors
///
/// Returns [`DetectionError::UnsupportedImage`] if the image has no pixels.
pub fn preprocess(image: &DynamicImage) -> Result<NormalizedTensor, DetectionError> {
    let rgb = fit_to_input(image)?.to_rgb8();

    let data: Vec<f32> = rgb.as_raw().iter().map(|&v| f32::from(v) / 255.0).collect();
    debug_assert_eq!(data.len(), INPUT_LEN);

    Ok(NormalizedTensor { data })
}
