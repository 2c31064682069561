//! `fazenda-install run`: headless installation, every phase in order.

use anyhow::Result;
use clap::Args;
use installer_common::{ConfigureRequest, FinishRequest};

use crate::app::AppContext;
use crate::application::services::phases::run_all;
use crate::commands::configure::ConfigureArgs;
use crate::commands::finish::FinishArgs;
use crate::output::json;
use crate::output::reporter::{TerminalReporter, TracingReporter};

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub finish: FinishArgs,

    #[command(flatten)]
    pub database: ConfigureArgs,
}

/// Run `fazenda-install run`.
///
/// # Errors
///
/// Returns an error if the prompt fails or the outcome cannot be rendered.
pub async fn run(app: &AppContext, args: RunArgs) -> Result<bool> {
    let prompt = format!("Install into {}?", app.install_path.display());
    if !app.confirm(&prompt, true, args.yes || app.is_json())? {
        app.output.info("Cancelled.");
        return Ok(true);
    }

    let configure: ConfigureRequest = args.database.into();
    let finish: FinishRequest = args.finish.into();

    let report = if app.is_json() {
        run_all(&app.install_context(&TracingReporter), &configure, finish).await
    } else {
        let reporter = TerminalReporter::new(&app.output);
        let report = run_all(&app.install_context(&reporter), &configure, finish).await;
        let summary = if report.succeeded() {
            "installation complete"
        } else {
            "installation failed"
        };
        reporter.finish(report.succeeded(), summary);
        report
    };

    if app.is_json() {
        let body = serde_json::json!({
            "outcomes": report.outcomes,
            "record": report.record,
        });
        println!("{}", json::format_outcome(&body)?);
    } else {
        for outcome in &report.outcomes {
            app.render(outcome)?;
        }
        if !report.record_written {
            app.output.warn("could not write the installation record");
        }
    }

    if report.succeeded() && args.finish.remove_installer {
        super::remove_installer(app).await;
    }
    Ok(report.succeeded())
}
