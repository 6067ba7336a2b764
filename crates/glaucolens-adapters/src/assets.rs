//! Static image assets served by the web views.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glaucolens_core::SeverityStage;
use tracing::{debug, warn};

/// Banner shown on the home page.
pub const HOME_BANNER: &str = "glaucoma-web.jpeg";

/// A loaded asset.
#[derive(Debug, Clone)]
pub struct Asset {
    /// File contents.
    pub bytes: Vec<u8>,
    /// MIME type derived from the extension.
    pub content_type: &'static str,
}

/// Read-only store of named images under a root directory.
///
/// Only the home banner and the severity stage images can be read; any other
/// name is treated as absent.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The asset directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if `name` is one of the served assets.
    #[must_use]
    pub fn is_known(name: &str) -> bool {
        name == HOME_BANNER || SeverityStage::ALL.iter().any(|s| s.asset_name() == name)
    }

    /// Reads an asset by name.
    ///
    /// Returns `Ok(None)` for unknown names and for known assets whose file is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn read(&self, name: &str) -> Result<Option<Asset>> {
        if !Self::is_known(name) {
            debug!("Refusing unknown asset {name:?}");
            return Ok(None);
        }

        let path = self.root.join(name);
        if !path.is_file() {
            warn!("Asset not found: {}", path.display());
            return Ok(None);
        }

        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read asset: {}", path.display()))?;

        Ok(Some(Asset {
            bytes,
            content_type: content_type(name),
        }))
    }

    /// Lists known assets that are missing on disk.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        std::iter::once(HOME_BANNER)
            .chain(SeverityStage::ALL.iter().map(|s| s.asset_name()))
            .filter(|name| !self.root.join(name).is_file())
            .collect()
    }
}

fn content_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
