//! GLAUCOLens Adapters - External adapters for GLAUCOLens.
//!
//! This crate provides adapters for:
//! - Upload and filesystem image decoding
//! - Static asset lookup
//! - Model artifact location and downloading

pub mod assets;
pub mod decode;
pub mod fs;
pub mod models;

pub use assets::{Asset, AssetStore, HOME_BANNER};
pub use decode::{decode_bytes, decode_upload};
pub use fs::{load_image, FsImageSource};
pub use models::{default_models_dir, ModelRegistry, ModelSource, ProgressCallback};
