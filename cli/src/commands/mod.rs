//! Command implementations

pub mod check;
pub mod configure;
pub mod finish;
pub mod install;
pub mod run;
pub mod serve;
pub mod version;

use anyhow::Result;
use installer_common::PhaseRequest;

use crate::app::AppContext;
use crate::application::services::phases::{self, run_cleanup};
use crate::output::reporter::{TerminalReporter, TracingReporter};

/// Run one phase with terminal progress and render its outcome.
async fn run_phase(app: &AppContext, request: &PhaseRequest) -> Result<bool> {
    let outcome = if app.is_json() {
        phases::run_phase(&app.install_context(&TracingReporter), request).await
    } else {
        let reporter = TerminalReporter::new(&app.output);
        let outcome = phases::run_phase(&app.install_context(&reporter), request).await;
        let status = if outcome.succeeded() { "done" } else { "failed" };
        reporter.finish(outcome.succeeded(), &format!("{}: {status}", outcome.phase()));
        outcome
    };
    app.render(&outcome)?;
    Ok(outcome.succeeded())
}

/// Run the cleanup script written by the finish phase.
async fn remove_installer(app: &AppContext) {
    match run_cleanup(&app.install_context(&TracingReporter)).await {
        Some(result) if result.succeeded => app.output.success("Installer removed"),
        Some(result) => app.output.error(&format!("Installer removal failed: {}", result.output)),
        None => app.output.warn("No cleanup script found"),
    }
}
