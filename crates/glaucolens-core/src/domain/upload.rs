//! Uploaded and decoded image types.

use std::path::Path;

use image::GenericImageView;

/// Upload formats accepted by the detection view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// `.jpg` or `.jpeg`.
    Jpeg,
    /// `.png`.
    Png,
}

impl UploadFormat {
    /// Extensions accepted by the file picker.
    pub const EXTENSIONS: &'static [&'static str] = &["jpg", "jpeg", "png"];

    /// Derives the declared format from a file name's extension, case-insensitively.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)?;
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Raw bytes of a user upload together with the name it was declared under.
///
/// Lives only for the request that carried it.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-supplied file name.
    pub file_name: String,
    /// Undecoded file contents.
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Creates a new upload.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// The declared format, if the extension is one we accept.
    #[must_use]
    pub fn declared_format(&self) -> Option<UploadFormat> {
        UploadFormat::from_file_name(&self.file_name)
    }
}

/// A decoded image with its origin.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path or upload name the image came from.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: image::DynamicImage,
}

impl ImageInfo {
    /// Wraps a decoded image, reading its dimensions.
    #[must_use]
    pub fn new(path: impl Into<String>, image: image::DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            path: path.into(),
            width,
            height,
            image,
        }
    }
}
