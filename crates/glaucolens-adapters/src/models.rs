//! Model artifact registry and download adapter.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Model metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// Filename in models directory.
    pub filename: &'static str,
}

/// The fundus classifier weights.
pub const CLASSIFIER: ModelInfo = ModelInfo {
    name: "glaucoma_classifier",
    filename: "glaucoma_classifier.safetensors",
};

/// Known models.
pub const MODELS: &[ModelInfo] = &[CLASSIFIER];

/// Progress callback: `(model name, bytes downloaded, total bytes if known)`.
pub type ProgressCallback = Box<dyn Fn(&str, u64, Option<u64>) + Send + Sync>;

/// Where to download a model from.
#[derive(Debug, Clone)]
pub struct ModelSource {
    /// Download URL.
    pub url: String,
    /// Expected SHA-256 as lowercase hex. Verification is skipped when absent.
    pub sha256: Option<String>,
}

/// Returns the default models directory.
///
/// Uses `XDG_DATA_HOME/glaucolens/models` or `~/.local/share/glaucolens/models`.
#[must_use]
pub fn default_models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glaucolens")
        .join("models")
}

/// Locates model files inside one directory.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    dir: PathBuf,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new(default_models_dir())
    }
}

impl ModelRegistry {
    /// Creates a registry over `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a registry over `dir`, or the default directory when `None`.
    #[must_use]
    pub fn with_override(dir: Option<PathBuf>) -> Self {
        dir.map_or_else(Self::default, Self::new)
    }

    /// The models directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to a specific model file.
    #[must_use]
    pub fn model_path(&self, name: &str) -> Option<PathBuf> {
        MODELS
            .iter()
            .find(|m| m.name == name)
            .map(|m| self.dir.join(m.filename))
    }

    /// Path of the classifier weights.
    #[must_use]
    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(CLASSIFIER.filename)
    }

    /// Lists models with their installed status.
    #[must_use]
    pub fn list(&self) -> Vec<(&'static ModelInfo, bool)> {
        MODELS
            .iter()
            .map(|m| (m, self.dir.join(m.filename).exists()))
            .collect()
    }

    /// Downloads the classifier unless it is already installed.
    ///
    /// Returns the path of the installed file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The models directory cannot be created
    /// - The download fails
    /// - The checksum doesn't match
    pub fn ensure_classifier(
        &self,
        source: &ModelSource,
        progress: Option<&ProgressCallback>,
    ) -> Result<PathBuf> {
        let path = self.classifier_path();
        if path.exists() {
            debug!("Model {} already exists", CLASSIFIER.name);
            return Ok(path);
        }

        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create models directory {}", self.dir.display())
        })?;
        download_model(&CLASSIFIER, source, &path, progress)?;
        Ok(path)
    }
}

/// Downloads a model, verifying its checksum before it is moved into place.
fn download_model(
    model: &ModelInfo,
    source: &ModelSource,
    path: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    info!("Downloading model {} from {}", model.name, source.url);

    let mut response = reqwest::blocking::get(&source.url)
        .with_context(|| format!("Failed to download {}", model.name))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status: {}", response.status());
    }

    let total = response.content_length();
    let downloaded = install_from(model, source, &mut response, total, path, progress)?;

    info!("Downloaded {} ({downloaded} bytes)", model.name);
    Ok(())
}

/// Writes `body` next to `path` as `.part`, verifies it, then moves it into
/// place. The `.part` file is removed on every failure.
///
/// Returns the number of bytes written.
fn install_from(
    model: &ModelInfo,
    source: &ModelSource,
    body: &mut impl Read,
    total: Option<u64>,
    path: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<u64> {
    let partial = path.with_extension("part");
    let result = write_partial(model, source, body, total, &partial, progress).and_then(|n| {
        fs::rename(&partial, path)
            .with_context(|| format!("Failed to move download into {}", path.display()))?;
        Ok(n)
    });

    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}

fn write_partial(
    model: &ModelInfo,
    source: &ModelSource,
    body: &mut impl Read,
    total: Option<u64>,
    partial: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<u64> {
    let mut file = fs::File::create(partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    let mut hasher = Sha256::new();
    let mut downloaded = 0u64;
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = body
            .read(&mut buf)
            .with_context(|| format!("Failed to read response for {}", model.name))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n])
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        downloaded += n as u64;
        if let Some(cb) = progress {
            cb(model.name, downloaded, total);
        }
    }
    file.flush()?;

    let hash = format!("{:x}", hasher.finalize());
    verify_checksum(model.name, source.sha256.as_deref(), &hash)?;
    Ok(downloaded)
}

/// Compares a computed hash with the expected one, if any.
fn verify_checksum(name: &str, expected: Option<&str>, actual: &str) -> Result<()> {
    match expected {
        None => {
            debug!("Skipping checksum verification for {name} (none configured)");
            Ok(())
        }
        Some(expected) if expected.eq_ignore_ascii_case(actual) => Ok(()),
        Some(expected) => anyhow::bail!(
            "Checksum mismatch for {name}: expected {expected}, got {actual}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_models_dir() {
        assert!(default_models_dir().ends_with("glaucolens/models"));
    }

    #[test]
    fn test_model_path() {
        let registry = ModelRegistry::new("/opt/models");
        let path = registry.model_path("glaucoma_classifier");
        assert_eq!(
            path,
            Some(PathBuf::from("/opt/models/glaucoma_classifier.safetensors"))
        );
        assert_eq!(registry.classifier_path(), path.unwrap_or_default());
    }

    #[test]
    fn test_model_path_unknown() {
        assert!(ModelRegistry::new("/opt/models").model_path("unknown").is_none());
    }

    #[test]
    fn test_with_override() {
        let registry = ModelRegistry::with_override(Some(PathBuf::from("/tmp/m")));
        assert_eq!(registry.dir(), Path::new("/tmp/m"));
        assert!(ModelRegistry::with_override(None)
            .dir()
            .ends_with("glaucolens/models"));
    }

    #[test]
    fn test_list_reports_installed() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let registry = ModelRegistry::new(dir.path());
        assert!(registry.list().iter().all(|(_, installed)| !installed));

        std::fs::write(registry.classifier_path(), b"weights")
            .unwrap_or_else(|e| panic!("write: {e}"));
        assert!(registry.list().iter().all(|(_, installed)| *installed));
    }

    #[test]
    fn test_ensure_classifier_skips_existing() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let registry = ModelRegistry::new(dir.path());
        std::fs::write(registry.classifier_path(), b"weights")
            .unwrap_or_else(|e| panic!("write: {e}"));

        // The URL is never contacted because the file is present.
        let source = ModelSource {
            url: "http://invalid.invalid/model.safetensors".into(),
            sha256: None,
        };
        let path = registry.ensure_classifier(&source, None);
        assert!(path.is_ok_and(|p| p.ends_with("glaucoma_classifier.safetensors")));
    }

    /// Yields `good` bytes, then fails.
    struct BrokenBody {
        good: Vec<u8>,
    }

    impl Read for BrokenBody {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.good.is_empty() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ));
            }
            let n = self.good.len().min(buf.len());
            buf[..n].copy_from_slice(&self.good[..n]);
            self.good.drain(..n);
            Ok(n)
        }
    }

    fn source(sha256: Option<String>) -> ModelSource {
        ModelSource {
            url: "http://invalid.invalid/model.safetensors".into(),
            sha256,
        }
    }

    #[test]
    fn test_install_moves_verified_download() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let registry = ModelRegistry::new(dir.path());
        let path = registry.classifier_path();
        let body = b"weights".to_vec();
        let sha = format!("{:x}", Sha256::digest(&body));

        let mut reader = std::io::Cursor::new(body);
        let written = install_from(&CLASSIFIER, &source(Some(sha)), &mut reader, None, &path, None)
            .unwrap_or_else(|e| panic!("install: {e}"));

        assert_eq!(written, 7);
        assert_eq!(fs::read(&path).unwrap_or_default(), b"weights");
        assert!(!path.with_extension("part").exists());
    }

    #[test]
    fn test_interrupted_download_removes_partial() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = ModelRegistry::new(dir.path()).classifier_path();
        let mut body = BrokenBody {
            good: vec![7u8; 1000],
        };

        let result = install_from(&CLASSIFIER, &source(None), &mut body, Some(4000), &path, None);

        assert!(result.is_err_and(|e| e.to_string().contains("Failed to read response")));
        assert!(!path.exists());
        assert!(!path.with_extension("part").exists());
    }

    #[test]
    fn test_checksum_mismatch_removes_partial() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = ModelRegistry::new(dir.path()).classifier_path();
        let mut reader = std::io::Cursor::new(b"tampered".to_vec());

        let result = install_from(
            &CLASSIFIER,
            &source(Some("00".repeat(32))),
            &mut reader,
            None,
            &path,
            None,
        );

        assert!(result.is_err_and(|e| e.to_string().contains("Checksum mismatch")));
        assert!(!path.exists());
        assert!(!path.with_extension("part").exists());
    }

    #[test]
    fn test_verify_checksum() {
        let hash = "ab".repeat(32);
        assert!(verify_checksum("m", None, &hash).is_ok());
        assert!(verify_checksum("m", Some(&hash), &hash).is_ok());
        assert!(verify_checksum("m", Some(&hash.to_uppercase()), &hash).is_ok());

        let err = verify_checksum("m", Some(&"cd".repeat(32)), &hash);
        assert!(err.is_err_and(|e| e.to_string().contains("Checksum mismatch")));
    }
}
