//! Serializable classification records and per-request outcomes.

use serde::{Deserialize, Serialize};

use super::{PredictionScore, Verdict};

/// Classification of a single image, as emitted by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Path to the classified image.
    pub path: String,
    /// Timestamp of classification (RFC 3339).
    pub timestamp: String,
    /// Raw classifier score.
    pub score: PredictionScore,
    /// Verdict derived from `score`.
    pub verdict: Verdict,
}

/// State of the detection view after one interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    /// The user has not uploaded anything yet.
    NoUploadYet,
    /// The upload was rejected; the message is shown to the user.
    Rejected {
        /// User-visible reason.
        message: String,
    },
    /// The upload was classified.
    Classified {
        /// Raw classifier score.
        score: PredictionScore,
        /// Verdict derived from `score`.
        verdict: Verdict,
    },
}
