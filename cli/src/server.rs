//! HTTP surface of the installer.
//!
//! One phase endpoint dispatching on the request's `action`, the embedded
//! wizard page, the post-install cleanup redirect and a health probe. Each
//! request builds a fresh `InstallContext`; nothing is kept between phases.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use installer_common::{PhaseOutcome, PhaseRequest, ServerConfig};
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;

use crate::application::services::phases::{InstallContext, run_cleanup, run_phase};
use crate::assets;
use crate::domain::InstallerConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::HostFs;
use crate::output::reporter::TracingReporter;

/// Shared, read-only server state.
pub struct AppState {
    pub runner: TokioCommandRunner,
    pub fs: HostFs,
    pub config: InstallerConfig,
    pub install_path: PathBuf,
    pub entry_file: String,
    /// Signalled once the cleanup redirect has been served.
    pub shutdown: Notify,
}

impl AppState {
    fn install_context(&self) -> InstallContext<'_, TokioCommandRunner, HostFs, TracingReporter> {
        InstallContext {
            runner: &self.runner,
            fs: &self.fs,
            reporter: &TracingReporter,
            config: &self.config,
            install_path: &self.install_path,
            entry_file: &self.entry_file,
        }
    }
}

/// Build the installer router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(wizard).post(phase))
        .route("/api/phase", axum::routing::post(phase))
        .route("/cleanup", get(cleanup))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn wizard() -> Response {
    match assets::wizard_page() {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "wizard page unavailable");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn phase(State(state): State<Arc<AppState>>, Json(request): Json<PhaseRequest>) -> Json<PhaseOutcome> {
    let ctx = state.install_context();
    Json(run_phase(&ctx, &request).await)
}

/// Runs the cleanup script and stops the server. Without a script the
/// installation is not finished, so the server keeps running.
async fn cleanup(State(state): State<Arc<AppState>>) -> Redirect {
    let ctx = state.install_context();
    if run_cleanup(&ctx).await.is_some() {
        state.shutdown.notify_one();
    } else {
        tracing::warn!("no cleanup script to run; server keeps running");
    }
    Redirect::to(&ctx.site_url())
}

/// Minimal health-check handler for probes.
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Bind `server.listen_addr` and serve until Ctrl-C or the cleanup redirect.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(server: &ServerConfig, state: AppState) -> Result<()> {
    let state = Arc::new(state);
    let app = router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", server.listen_addr))?;
    tracing::info!(
        listen_addr = %server.listen_addr,
        install_path = %state.install_path.display(),
        "installer wizard ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .context("HTTP server error")?;

    tracing::info!("installer shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or the end of the installation.
async fn shutdown_signal(state: Arc<AppState>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to install Ctrl-C handler");
                state.shutdown.notified().await;
            }
            tracing::info!("received shutdown signal");
        }
        () = state.shutdown.notified() => tracing::info!("installation finished"),
    }
}
