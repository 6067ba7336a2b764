//! ML inference using Candle.
//!
//! Provides preprocessing, model loading and the fundus classifier network.

mod classifier;
mod device;
mod loader;
mod preprocess;

pub use classifier::{FundusClassifier, FLATTENED_FEATURES, HIDDEN_UNITS, PARAMETER_SHAPES};
pub use device::select_device;
pub use loader::{load_classifier, load_safetensors};
pub use preprocess::{
    fit_to_input, preprocess, NormalizedTensor, INPUT_CHANNELS, INPUT_SHAPE, INPUT_SIZE,
    RESAMPLE_FILTER,
};
