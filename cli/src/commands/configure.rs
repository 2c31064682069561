//! `fazenda-install configure`: database, configuration files and schema.

use anyhow::Result;
use clap::Args;
use installer_common::{ConfigureRequest, PhaseRequest};

use crate::app::AppContext;

/// Database settings; blank values fall back to the configured defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigureArgs {
    /// Database name
    #[arg(long)]
    pub db_name: Option<String>,

    /// Database user
    #[arg(long)]
    pub db_user: Option<String>,

    /// Database password (generated when omitted)
    #[arg(long, env = "FAZENDA_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database host
    #[arg(long)]
    pub db_host: Option<String>,
}

impl From<ConfigureArgs> for ConfigureRequest {
    fn from(args: ConfigureArgs) -> Self {
        Self {
            db_name: args.db_name,
            db_user: args.db_user,
            db_password: args.db_password,
            db_host: args.db_host,
        }
    }
}

/// Run `fazenda-install configure`.
///
/// # Errors
///
/// Returns an error if the outcome cannot be rendered.
pub async fn run(app: &AppContext, args: ConfigureArgs) -> Result<bool> {
    super::run_phase(app, &PhaseRequest::ConfigureSystem(args.into())).await
}
