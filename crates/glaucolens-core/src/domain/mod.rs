//! Core domain types for fundus screening.

mod error;
mod page;
mod report;
mod risk;
mod stage;
mod upload;
mod verdict;

pub use error::DetectionError;
pub use page::Page;
pub use report::{ClassificationReport, DetectionOutcome};
pub use risk::{RiskAssessment, RiskInputs, RiskTier, DEFAULT_AGE, MAX_AGE, MIN_AGE};
pub use stage::SeverityStage;
pub use upload::{ImageInfo, UploadFormat, UploadedImage};
pub use verdict::{PredictionScore, Verdict, DECISION_THRESHOLD};
