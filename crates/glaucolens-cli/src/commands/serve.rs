//! Serve command - run the web application.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use glaucolens_adapters::AssetStore;
use glaucolens_cli::config::AppConfig;
use glaucolens_cli::server::{self, AppState};
use tokio::net::TcpListener;
use tracing::warn;

use super::ModelArgs;

/// Arguments for the serve command
#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on [default: 127.0.0.1:8501]
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory containing the banner and severity stage images
    #[arg(long, value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Run the serve command. Blocks until the server shuts down.
pub fn run(args: &ServeArgs, models_dir: Option<&Path>, config: &AppConfig) -> Result<()> {
    let bind = args.bind.clone().unwrap_or_else(|| config.bind());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{bind}'"))?;

    let assets = AssetStore::new(
        args.assets_dir
            .clone()
            .unwrap_or_else(|| config.assets_dir()),
    );
    let missing = assets.missing();
    if !missing.is_empty() {
        warn!(
            "Missing assets in {}: {}",
            assets.root().display(),
            missing.join(", ")
        );
    }

    // Loaded before binding so a missing artifact never leaves a half-started server.
    let model = args.model.load(models_dir, config)?;
    let state = AppState::new(model, assets).with_max_upload_bytes(config.max_upload_bytes());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        server::serve(listener, state).await
    })
}
