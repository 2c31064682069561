//! `fazenda-install check`: probe the host and validate prerequisites.

use anyhow::Result;
use installer_common::PhaseRequest;

use crate::app::AppContext;

/// Run `fazenda-install check`.
///
/// # Errors
///
/// Returns an error if the outcome cannot be rendered.
pub async fn run(app: &AppContext) -> Result<bool> {
    super::run_phase(app, &PhaseRequest::CheckEnvironment).await
}
