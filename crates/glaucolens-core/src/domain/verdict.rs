//! Classifier output and the decision rule applied to it.

use serde::{Deserialize, Serialize};

/// Scores strictly above this value are classified as healthy.
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Binary outcome of classifying a fundus image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The classifier considers the eye healthy.
    Healthy,
    /// The classifier flags the eye as possibly glaucomatous.
    GlaucomaSuspected,
}

impl Verdict {
    /// Applies the decision rule: `score > 0.5` is healthy, anything else is suspected.
    #[must_use]
    pub fn from_score(score: PredictionScore) -> Self {
        if score.value() > DECISION_THRESHOLD {
            Self::Healthy
        } else {
            Self::GlaucomaSuspected
        }
    }

    /// User-facing prediction message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Healthy => "Prediction: Your eye is healthy!",
            Self::GlaucomaSuspected => {
                "Prediction: You are affected by Glaucoma. \
                 Please consult an ophthalmologist as soon as possible."
            }
        }
    }

    /// Returns true for [`Verdict::GlaucomaSuspected`].
    #[must_use]
    pub const fn is_suspected(self) -> bool {
        matches!(self, Self::GlaucomaSuspected)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => f.write_str("healthy"),
            Self::GlaucomaSuspected => f.write_str("glaucoma_suspected"),
        }
    }
}

/// Raw classifier output in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionScore(f32);

impl PredictionScore {
    /// Wraps a score, returning `None` if it is NaN or outside `[0, 1]`.
    #[must_use]
    pub fn new(value: f32) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    /// The wrapped value.
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(value: f32) -> Verdict {
        Verdict::from_score(PredictionScore::new(value).unwrap_or_else(|| panic!("valid score")))
    }

    #[test]
    fn test_exact_threshold_is_suspected() {
        assert_eq!(verdict(0.5), Verdict::GlaucomaSuspected);
    }

    #[test]
    fn test_just_above_threshold_is_healthy() {
        assert_eq!(verdict(0.500_000_1), Verdict::Healthy);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(verdict(0.0), Verdict::GlaucomaSuspected);
        assert_eq!(verdict(1.0), Verdict::Healthy);
    }

    #[test]
    fn test_score_rejects_out_of_range() {
        assert!(PredictionScore::new(-0.01).is_none());
        assert!(PredictionScore::new(1.01).is_none());
        assert!(PredictionScore::new(f32::NAN).is_none());
    }

    #[test]
    fn test_verdict_serializes_snake_case() {
        let json = serde_json::to_string(&Verdict::GlaucomaSuspected).unwrap_or_default();
        assert_eq!(json, "\"glaucoma_suspected\"");
        assert_eq!(Verdict::Healthy.to_string(), "healthy");
    }
}
