//! `fazenda-install finish [--remove-installer]`

use anyhow::Result;
use clap::Args;
use installer_common::{FinishRequest, PhaseRequest};

use crate::app::AppContext;

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct FinishArgs {
    /// Delete the installer once the installation is complete
    #[arg(long)]
    pub remove_installer: bool,
}

impl From<FinishArgs> for FinishRequest {
    fn from(args: FinishArgs) -> Self {
        Self {
            remove_installer: args.remove_installer,
        }
    }
}

/// Run `fazenda-install finish`.
///
/// There is no browser to follow the cleanup redirect here, so the cleanup
/// script runs straight away.
///
/// # Errors
///
/// Returns an error if the outcome cannot be rendered.
pub async fn run(app: &AppContext, args: &FinishArgs) -> Result<bool> {
    let request = PhaseRequest::FinishInstallation((*args).into());
    let succeeded = super::run_phase(app, &request).await?;
    if succeeded && args.remove_installer {
        super::remove_installer(app).await;
    }
    Ok(succeeded)
}
