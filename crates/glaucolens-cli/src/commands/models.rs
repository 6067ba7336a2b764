//! Models command - manage the classifier weights.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use glaucolens_adapters::{ModelRegistry, ModelSource, ProgressCallback};
use glaucolens_cli::config::AppConfig;
use indicatif::{ProgressBar, ProgressStyle};

use super::registry;

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download the classifier weights
    Fetch(FetchArgs),
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Arguments for `models fetch`
#[derive(Args)]
pub struct FetchArgs {
    /// Download URL (overrides config `[models] url`)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Expected SHA-256 of the file (overrides config `[models] sha256`)
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,
}

impl FetchArgs {
    fn source(&self, config: &AppConfig) -> Result<ModelSource> {
        let url = self
            .url
            .clone()
            .or_else(|| config.models.url.clone())
            .context("No download URL configured. Pass --url or set [models] url")?;
        let sha256 = self.sha256.clone().or_else(|| config.models.sha256.clone());
        Ok(ModelSource { url, sha256 })
    }
}

/// Run the models command.
pub fn run(args: &ModelsArgs, models_dir: Option<&Path>, config: &AppConfig) -> Result<()> {
    let registry = registry(models_dir, config);
    match args.command {
        ModelsCommand::Fetch(ref fetch) => fetch_models(&registry, &fetch.source(config)?),
        ModelsCommand::List => list_models(&registry),
        ModelsCommand::Path => print_path(&registry),
    }
}

fn fetch_models(registry: &ModelRegistry, source: &ModelSource) -> Result<()> {
    let pb = Arc::new(ProgressBar::new(0));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?
            .progress_chars("#>-"),
    );

    let pb_clone = Arc::clone(&pb);
    let progress: ProgressCallback =
        Box::new(move |name: &str, downloaded: u64, total: Option<u64>| {
            if downloaded == 0 || pb_clone.message().is_empty() {
                if let Some(t) = total {
                    pb_clone.set_length(t);
                }
                pb_clone.set_message(name.to_string());
            }
            pb_clone.set_position(downloaded);
        });

    let path = registry.ensure_classifier(source, Some(&progress))?;

    pb.finish_with_message("Classifier ready");
    println!("{}", path.display());
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn list_models(registry: &ModelRegistry) -> Result<()> {
    let models = registry.list();

    println!("Models directory: {}", registry.dir().display());
    println!();

    for (info, installed) in &models {
        let status = if *installed { "✓" } else { "✗" };
        println!("  {status} {} ({})", info.name, info.filename);
    }

    println!();
    let installed_count = models.iter().filter(|(_, installed)| *installed).count();
    println!("{}/{} models installed", installed_count, models.len());

    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn print_path(registry: &ModelRegistry) -> Result<()> {
    println!("{}", registry.dir().display());
    Ok(())
}
