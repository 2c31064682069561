//! `fazenda-install serve`: the browser wizard.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;
use installer_common::ServerConfig;

use crate::app::AppContext;
use crate::server::{self, AppState};

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to listen on (default: FAZENDA_INSTALLER_LISTEN_ADDR or 127.0.0.1:8090)
    #[arg(long)]
    pub listen: Option<SocketAddr>,
}

/// Run `fazenda-install serve` until the installation finishes or Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server configuration is invalid or the listener
/// cannot be bound.
pub async fn run(app: AppContext, args: &ServeArgs) -> Result<()> {
    let mut config: ServerConfig = envy::prefixed("FAZENDA_INSTALLER_")
        .from_env()
        .context("failed to load server config from FAZENDA_INSTALLER_* env vars")?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    if !app.is_json() {
        app.output
            .info(&format!("Open http://{}/ in your browser", config.listen_addr));
    }

    let state = AppState {
        runner: app.runner,
        fs: app.fs,
        config: app.config,
        install_path: app.install_path,
        entry_file: app.entry_file,
        shutdown: tokio::sync::Notify::new(),
    };
    server::serve(&config, state).await
}
