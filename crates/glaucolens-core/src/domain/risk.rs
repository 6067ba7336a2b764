//! Risk questionnaire inputs and outcome types.

use serde::{Deserialize, Serialize};

/// Lowest age the questionnaire accepts.
pub const MIN_AGE: u32 = 10;
/// Highest age the questionnaire accepts.
pub const MAX_AGE: u32 = 100;
/// Age preselected by the questionnaire.
pub const DEFAULT_AGE: u32 = 30;

/// Answers to the self-assessment questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInputs {
    /// Age in years, within `10..=100`.
    pub age: u32,
    /// Family history of glaucoma.
    pub family_history: bool,
    /// Diagnosed diabetes.
    pub diabetes: bool,
    /// Diagnosed high blood pressure.
    pub high_bp: bool,
}

impl RiskInputs {
    /// Creates inputs, clamping `age` into the accepted range.
    #[must_use]
    pub fn new(age: u32, family_history: bool, diabetes: bool, high_bp: bool) -> Self {
        Self {
            age: age.clamp(MIN_AGE, MAX_AGE),
            family_history,
            diabetes,
            high_bp,
        }
    }
}

impl Default for RiskInputs {
    fn default() -> Self {
        Self::new(DEFAULT_AGE, false, false, false)
    }
}

/// Coarse risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Score below 2.
    Low,
    /// Score of 2 or 3.
    Moderate,
    /// Score of 4 or more.
    High,
}

impl RiskTier {
    /// Advice shown for this tier.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::High => "High Risk: You should consult an eye specialist immediately.",
            Self::Moderate => "Moderate Risk: Consider scheduling an eye check-up soon.",
            Self::Low => "Low Risk: Keep up with routine eye check-ups.",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Moderate => f.write_str("moderate"),
            Self::High => f.write_str("high"),
        }
    }
}

/// Result of scoring a questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Points accumulated, `0..=6`.
    pub score: u8,
    /// Tier derived from `score`.
    pub tier: RiskTier,
}
