//! Synthetic image builders for testing.

use std::io::Cursor;

use glaucolens_core::ImageInfo;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

/// Builder for creating synthetic test images.
///
/// Produces fundus-like pictures: a dark background, an orange retina and a
/// bright optic disc.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Fundus-like Images ===

    /// Creates a fundus-like RGB image: a circular orange retina on black with
    /// a pale optic disc right of center.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn fundus(width: u32, height: u32) -> ImageInfo {
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        let radius = width.min(height) as f32 * 0.45;
        let disc_x = cx + radius * 0.4;
        let disc_r = radius * 0.15;

        let img = RgbImage::from_fn(width, height, |x, y| {
            let (fx, fy) = (x as f32, y as f32);
            let dist = (fx - cx).hypot(fy - cy);
            if dist > radius {
                return Rgb([0, 0, 0]);
            }
            if (fx - disc_x).hypot(fy - cy) < disc_r {
                return Rgb([250, 230, 170]);
            }
            let falloff = 1.0 - 0.5 * (dist / radius);
            Rgb([(220.0 * falloff) as u8, (90.0 * falloff) as u8, (30.0 * falloff) as u8])
        });
        ImageInfo::new("synthetic://fundus", DynamicImage::ImageRgb8(img))
    }

    /// Creates a grayscale fundus-like image.
    #[must_use]
    pub fn grayscale_fundus(width: u32, height: u32) -> ImageInfo {
        let rgb = Self::fundus(width, height);
        ImageInfo::new(
            "synthetic://grayscale_fundus",
            DynamicImage::ImageLuma8(rgb.image.to_luma8()),
        )
    }

    /// Creates a fundus-like image with an alpha channel.
    #[must_use]
    pub fn rgba_fundus(width: u32, height: u32) -> ImageInfo {
        let rgb = Self::fundus(width, height).image.to_rgb8();
        let img = RgbaImage::from_fn(width, height, |x, y| {
            let p = rgb.get_pixel(x, y);
            Rgba([p[0], p[1], p[2], 128])
        });
        ImageInfo::new("synthetic://rgba_fundus", DynamicImage::ImageRgba8(img))
    }

    // === Encoding ===

    /// Encodes an image as PNG bytes.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which only happens for unsupported color types.
    #[must_use]
    pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        encode(image, ImageFormat::Png)
    }

    /// Encodes an image as JPEG bytes. Alpha is dropped first.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails.
    #[must_use]
    pub fn jpeg_bytes(image: &DynamicImage) -> Vec<u8> {
        encode(&DynamicImage::ImageRgb8(image.to_rgb8()), ImageFormat::Jpeg)
    }
}

#[allow(clippy::panic)]
fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    if let Err(e) = image.write_to(&mut buf, format) {
        panic!("failed to encode synthetic image as {format:?}: {e}");
    }
    buf.into_inner()
}
