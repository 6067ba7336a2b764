//! Vision simulator stage lookup.

use crate::domain::SeverityStage;

/// Highest value on the severity slider.
pub const MAX_SEVERITY: u32 = 100;
/// Severity preselected on the slider.
pub const DEFAULT_SEVERITY: u32 = 25;

/// Maps a slider value to the stage image to show.
///
/// Values above [`MAX_SEVERITY`] are treated as [`MAX_SEVERITY`].
#[must_use]
pub const fn stage_for_severity(severity: u32) -> SeverityStage {
    let severity = if severity > MAX_SEVERITY {
        MAX_SEVERITY
    } else {
        severity
    };
    match severity {
        0..=24 => SeverityStage::Normal,
        25..=49 => SeverityStage::Mild,
        50..=74 => SeverityStage::Medium,
        _ => SeverityStage::Severe,
    }
}
