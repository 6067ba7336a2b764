//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod image_source;
mod result_output;
mod score_model;

pub use image_source::ImageSource;
pub use result_output::ResultOutput;
pub use score_model::ScoreModel;
