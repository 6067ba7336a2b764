//! Classify command - run the fundus classifier over image files.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use glaucolens_adapters::FsImageSource;
use glaucolens_cli::config::AppConfig;
use glaucolens_core::{ClassificationReport, ImageSource, InferenceAdapter, ResultOutput};
use tracing::{debug, info, warn};

use super::{ExitCode, ModelArgs};
use crate::output::JsonOutput;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Arguments for the classify command
#[derive(Args, Clone)]
pub struct ClassifyArgs {
    /// Fundus images or directories to classify
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl ClassifyArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        if self.format.is_none() {
            self.format = config
                .output
                .format
                .as_deref()
                .and_then(|s| OutputFormat::from_str(s, true).ok());
        }
        if !self.pretty {
            self.pretty = config.output.pretty.unwrap_or(false);
        }
        self
    }

    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Result of running the classify command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct ClassifyResult {
    /// Number of images classified.
    pub processed: usize,
    /// Number of images skipped.
    pub skipped: usize,
    /// Number of images classified as glaucoma suspected.
    pub suspected: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the classify command.
///
/// Expects `args` to have been processed through `with_config()` first.
pub fn run(
    args: &ClassifyArgs,
    models_dir: Option<&Path>,
    config: &AppConfig,
) -> Result<ClassifyResult> {
    info!("Running classify command on {} paths", args.paths.len());

    let model = args.model.load(models_dir, config)?;
    let adapter = InferenceAdapter::new(model);
    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let output = JsonOutput::stdout();

    classify_images(&source, &adapter, &output, args)
}

fn classify_images(
    source: &dyn ImageSource,
    adapter: &InferenceAdapter,
    output: &dyn ResultOutput,
    args: &ClassifyArgs,
) -> Result<ClassifyResult> {
    if let Some(total) = source.count_hint() {
        debug!("Classifying {total} images");
    }

    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut suspected = 0usize;
    let mut all_reports: Vec<ClassificationReport> = Vec::new();

    for (path, loaded) in source.images() {
        let image = match loaded {
            Ok(image) => image,
            Err(e) => {
                warn!("Skipping {path}: {e:#}");
                eprintln!("warning: skipping {path}: {e:#}");
                skipped += 1;
                continue;
            }
        };

        let (score, verdict) = match adapter.classify_scored(&image.image) {
            Ok(classified) => classified,
            Err(e) if e.is_user_error() => {
                eprintln!("warning: skipping {path}: {e}");
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if verdict.is_suspected() {
            suspected += 1;
        }

        let report = ClassificationReport {
            path: image.path,
            timestamp: iso_timestamp(),
            score,
            verdict,
        };

        match args.format() {
            OutputFormat::Jsonl => output.write(&report)?,
            OutputFormat::Json => all_reports.push(report),
        }
        processed += 1;
    }

    if args.format() == OutputFormat::Json {
        output.write_batch(&all_reports, args.pretty)?;
    }
    output.flush()?;

    info!("Classified {processed} images ({suspected} suspected, {skipped} skipped)");

    let exit_code = if suspected > 0 {
        ExitCode::Suspected
    } else {
        ExitCode::Success
    };

    Ok(ClassifyResult {
        processed,
        skipped,
        suspected,
        exit_code,
    })
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
