//! CLI command definitions and handlers.

pub mod classify;
pub mod models;
pub mod risk;
pub mod serve;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glaucolens_adapters::ModelRegistry;
use glaucolens_cli::config::AppConfig;
use glaucolens_core::inference::{load_classifier, select_device, FundusClassifier};
use tracing::info;

/// GLAUCOLens - fundus glaucoma screening
#[derive(Parser)]
#[command(name = "glaucolens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR", global = true)]
    pub models_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the web application
    Serve(serve::ServeArgs),
    /// Classify fundus images from the command line
    Classify(classify::ClassifyArgs),
    /// Score the glaucoma risk questionnaire
    Risk(risk::RiskArgs),
    /// Manage the classifier weights
    Models(models::ModelsArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Everything classified as healthy, or the command succeeded.
    Success = 0,
    /// At least one image was classified as glaucoma suspected.
    Suspected = 1,
    /// The command failed.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Classifier selection shared by `serve` and `classify`.
#[derive(Args, Clone, Default)]
pub struct ModelArgs {
    /// Classifier weights file (overrides config and models directory)
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Run inference on the CPU even if a GPU is available
    #[arg(long)]
    pub cpu: bool,
}

impl ModelArgs {
    /// Resolves the weights file.
    ///
    /// Priority: `--model` > config `[models] path` > `<models dir>/glaucoma_classifier.safetensors`,
    /// where the models dir is `--models-dir` > config `[models] dir` > XDG data dir.
    #[must_use]
    pub fn resolve_path(&self, models_dir: Option<&Path>, config: &AppConfig) -> PathBuf {
        if let Some(ref path) = self.model {
            return path.clone();
        }
        if let Some(ref path) = config.models.path {
            return path.clone();
        }
        registry(models_dir, config).classifier_path()
    }

    /// Loads the classifier once; the result is shared for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights are missing or malformed.
    pub fn load(
        &self,
        models_dir: Option<&Path>,
        config: &AppConfig,
    ) -> Result<Arc<FundusClassifier>> {
        let path = self.resolve_path(models_dir, config);
        let device = select_device(self.cpu || config.models.cpu.unwrap_or(false));
        info!("Loading classifier from {}", path.display());

        let classifier = load_classifier(&path, &device)
            .context("Failed to load classifier (run `glaucolens models fetch` or pass --model)")?;
        Ok(Arc::new(classifier))
    }
}

/// Models registry honouring `--models-dir` > config `[models] dir` > default.
#[must_use]
pub fn registry(models_dir: Option<&Path>, config: &AppConfig) -> ModelRegistry {
    let dir = models_dir
        .map(Path::to_path_buf)
        .or_else(|| config.models.dir.clone());
    ModelRegistry::with_override(dir)
}
