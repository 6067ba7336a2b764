//! Image source port for batch classification.

use crate::domain::ImageInfo;

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// Each item carries the path it came from so undecodable files can be
    /// reported individually.
    fn images(&self) -> Box<dyn Iterator<Item = (String, anyhow::Result<ImageInfo>)> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
