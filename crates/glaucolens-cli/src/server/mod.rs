//! Web front-end.
//!
//! One GET route renders whichever page the sidebar selects; uploads are
//! posted to `/detection` and classified off the async runtime.

mod handlers;
pub mod views;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use glaucolens_adapters::AssetStore;
use glaucolens_core::{InferenceAdapter, ScoreModel};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::defaults;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Classifier wrapper; the model inside is loaded once at startup.
    pub adapter: InferenceAdapter,
    /// Home banner and severity stage images.
    pub assets: AssetStore,
    /// Largest accepted request body on the upload route.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Creates state around an already loaded model.
    #[must_use]
    pub fn new(model: Arc<dyn ScoreModel>, assets: AssetStore) -> Self {
        Self {
            adapter: InferenceAdapter::new(model),
            assets,
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
        }
    }

    /// Overrides the upload size limit.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::page_handler))
        .route(
            "/detection",
            post(handlers::detection_handler).layer(DefaultBodyLimit::max(limit)),
        )
        .route("/assets/:name", get(handlers::asset_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .with_state(state)
}

/// Serves the application on `listener` until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!("GLAUCOLens listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server failed")
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received");
}
