//! GLAUCOLens Core - Domain logic and inference
//!
//! This crate contains the domain types, fundus preprocessing, the candle
//! classifier, the inference adapter, the risk questionnaire and the vision
//! simulator lookup.

pub mod domain;
pub mod inference;
pub mod modules;
pub mod ports;

pub use domain::{
    ClassificationReport, DetectionError, DetectionOutcome, ImageInfo, Page, PredictionScore,
    RiskAssessment, RiskInputs, RiskTier, SeverityStage, UploadFormat, UploadedImage, Verdict,
};
pub use modules::{assess_risk, stage_for_severity, InferenceAdapter};
pub use ports::{ImageSource, ResultOutput, ScoreModel};
