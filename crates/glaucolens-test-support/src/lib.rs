//! Test support utilities for GLAUCOLens.
//!
//! Provides mocks, synthetic fundus builders and constant-output weight files
//! for testing the detection pipeline.
//!
//! # Example
//!
//! ```
//! use glaucolens_core::{InferenceAdapter, Verdict};
//! use glaucolens_test_support::{MockScoreModel, SyntheticImageBuilder};
//!
//! let adapter = InferenceAdapter::new(MockScoreModel::healthy());
//! let fundus = SyntheticImageBuilder::fundus(320, 240);
//! assert_eq!(adapter.classify(&fundus.image).ok(), Some(Verdict::Healthy));
//! ```

mod builders;
mod mocks;
mod weights;

pub use builders::SyntheticImageBuilder;
pub use mocks::{FailingScoreModel, MockImageSource, MockResultOutput, MockScoreModel};
pub use weights::{constant_classifier_bytes, logit_for_score, write_constant_classifier};
