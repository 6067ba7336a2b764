//! Risk questionnaire scoring.

use crate::domain::{RiskAssessment, RiskInputs, RiskTier};

/// Age above which the age factor applies.
const AGE_THRESHOLD: u32 = 60;

/// Scores a questionnaire.
///
/// Points: age over 60 and family history count 2 each, diabetes and high
/// blood pressure 1 each. Four or more points is high risk, two or more
/// moderate, anything less low.
#[must_use]
pub fn assess_risk(inputs: &RiskInputs) -> RiskAssessment {
    let score = 2 * u8::from(inputs.age > AGE_THRESHOLD)
        + 2 * u8::from(inputs.family_history)
        + u8::from(inputs.diabetes)
        + u8::from(inputs.high_bp);

    let tier = match score {
        4.. => RiskTier::High,
        2..=3 => RiskTier::Moderate,
        _ => RiskTier::Low,
    };

    RiskAssessment { score, tier }
}
