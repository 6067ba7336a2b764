//! View logic.
//!
//! Detection runs the classifier; the questionnaire and simulator are pure
//! functions of their widget values.

mod detection;
mod risk;
mod simulator;

pub use detection::InferenceAdapter;
pub use risk::assess_risk;
pub use simulator::{stage_for_severity, DEFAULT_SEVERITY, MAX_SEVERITY};
