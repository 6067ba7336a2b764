//! Configuration file support for glaucolens.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/glaucolens/config.toml` (lowest priority)
//! - Project-local: `.glaucolens.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

/// Name of the project-local config file.
pub const PROJECT_CONFIG_FILE: &str = ".glaucolens.toml";

/// Hardcoded defaults used when neither config nor CLI set a value.
pub mod defaults {
    /// Address the web server binds to.
    pub const BIND: &str = "127.0.0.1:8501";
    /// Largest accepted upload.
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
    /// Directory holding the static images.
    pub const ASSETS_DIR: &str = "assets";
}

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Web server settings.
    pub server: ServerConfig,
    /// Model settings.
    pub models: ModelsConfig,
    /// Static asset settings.
    pub assets: AssetsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Web server configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8501`.
    pub bind: Option<String>,
    /// Maximum upload size in bytes.
    pub max_upload_bytes: Option<usize>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
    /// Explicit classifier weights file; wins over `dir`.
    pub path: Option<PathBuf>,
    /// Download URL for `models fetch`.
    pub url: Option<String>,
    /// Expected SHA-256 of the downloaded weights.
    pub sha256: Option<String>,
    /// Run inference on the CPU even if a GPU is available.
    pub cpu: Option<bool>,
}

/// Static asset configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory containing the home banner and stage images.
    pub dir: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/glaucolens/config.toml`
    /// 2. Project-local: `.glaucolens.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    #[must_use]
    pub fn load() -> Self {
        let cwd = std::env::current_dir().ok();
        Self::load_from(xdg_config_path().as_deref(), cwd.as_deref())
    }

    /// Load configuration from an explicit XDG file and project search root.
    #[must_use]
    pub fn load_from(xdg_path: Option<&Path>, project_root: Option<&Path>) -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_path {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = project_root.and_then(find_config_in_parents) {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref bind) = self.server.bind {
            if bind.parse::<SocketAddr>().is_err() {
                return Err(format!(
                    "server.bind must be an address like 127.0.0.1:8501, got '{bind}'"
                ));
            }
        }

        if self.server.max_upload_bytes == Some(0) {
            return Err("server.max_upload_bytes must be greater than 0".to_string());
        }

        if let Some(ref hash) = self.models.sha256 {
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!(
                    "models.sha256 must be 64 hex characters, got '{hash}'"
                ));
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    pub fn merge(&mut self, other: Self) {
        // Server
        self.server.bind = other.server.bind.or_else(|| self.server.bind.take());
        self.server.max_upload_bytes = other
            .server
            .max_upload_bytes
            .or(self.server.max_upload_bytes);

        // Models
        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());
        self.models.path = other.models.path.or_else(|| self.models.path.take());
        self.models.url = other.models.url.or_else(|| self.models.url.take());
        self.models.sha256 = other.models.sha256.or_else(|| self.models.sha256.take());
        self.models.cpu = other.models.cpu.or(self.models.cpu);

        // Assets
        self.assets.dir = other.assets.dir.or_else(|| self.assets.dir.take());

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
    }

    /// Bind address with fallback to the hardcoded default.
    #[must_use]
    pub fn bind(&self) -> String {
        self.server
            .bind
            .clone()
            .unwrap_or_else(|| defaults::BIND.to_string())
    }

    /// Upload limit with fallback to the hardcoded default.
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        self.server
            .max_upload_bytes
            .filter(|&n| n > 0)
            .unwrap_or(defaults::MAX_UPLOAD_BYTES)
    }

    /// Asset directory with fallback to the hardcoded default.
    #[must_use]
    pub fn assets_dir(&self) -> PathBuf {
        self.assets
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::ASSETS_DIR))
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("glaucolens").join("config.toml"))
}

/// Search for `.glaucolens.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
