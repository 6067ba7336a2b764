//! Decoding of uploaded and on-disk images.

use std::io::Cursor;

use glaucolens_core::{DetectionError, UploadFormat, UploadedImage};
use image::{DynamicImage, ImageReader};
use tracing::debug;

/// Decodes an upload into an image.
///
/// The declared extension must be jpg, jpeg or png; the bytes themselves are
/// decoded by sniffing their content, so a PNG uploaded as `.jpg` still
/// decodes.
///
/// # Errors
///
/// Returns [`DetectionError::UnsupportedImage`] if the extension is not
/// accepted, the upload is empty, or the bytes are not a decodable image.
pub fn decode_upload(upload: &UploadedImage) -> Result<DynamicImage, DetectionError> {
    if upload.declared_format().is_none() {
        return Err(DetectionError::unsupported(format!(
            "'{}' is not a {} file",
            upload.file_name,
            UploadFormat::EXTENSIONS.join("/")
        )));
    }

    decode_bytes(&upload.file_name, &upload.bytes)
}

/// Decodes raw bytes, guessing the format from content.
///
/// # Errors
///
/// Returns [`DetectionError::UnsupportedImage`] if the bytes are empty or
/// cannot be decoded.
pub fn decode_bytes(name: &str, bytes: &[u8]) -> Result<DynamicImage, DetectionError> {
    if bytes.is_empty() {
        return Err(DetectionError::unsupported(format!("'{name}' is empty")));
    }

    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DetectionError::unsupported(format!("'{name}': {e}")))?
        .decode()
        .map_err(|e| DetectionError::unsupported(format!("'{name}' could not be decoded: {e}")))?;

    debug!(
        "Decoded {name}: {}x{} {:?}",
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}
