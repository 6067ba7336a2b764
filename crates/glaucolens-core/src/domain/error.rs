//! Error taxonomy for the detection path.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that can occur between an upload and a verdict.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The classifier artifact is absent or unreadable. Fatal at startup.
    #[error("model artifact {} could not be loaded: {reason}", path.display())]
    MissingArtifact {
        /// Path that was tried.
        path: PathBuf,
        /// Underlying cause, with context.
        reason: String,
    },

    /// The uploaded file is not an accepted or decodable image.
    #[error("unsupported image: {reason}")]
    UnsupportedImage {
        /// Why the image was rejected.
        reason: String,
    },

    /// The model failed to produce a valid score.
    #[error("inference failed: {reason}")]
    Inference {
        /// Underlying cause.
        reason: String,
    },
}

impl DetectionError {
    /// Builds a [`DetectionError::MissingArtifact`] from an error chain.
    pub fn missing_artifact(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        Self::MissingArtifact {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }

    /// Builds a [`DetectionError::UnsupportedImage`].
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedImage {
            reason: reason.into(),
        }
    }

    /// Returns true if the failure was caused by the user's input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::UnsupportedImage { .. })
    }
}
