//! Human-readable terminal renderer.

use installer_common::{
    CheckEnvironmentOutcome, CommandResult, ConfigureOutcome, DatabaseSetupResult, FinishOutcome,
    InstallFilesOutcome, PhaseOutcome,
};
use owo_colors::OwoColorize as _;

use crate::output::OutputContext;

/// Renders phase outcomes as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render any phase outcome.
    pub fn render_phase(&self, outcome: &PhaseOutcome) {
        match outcome {
            PhaseOutcome::CheckEnvironment(o) => self.render_check(o),
            PhaseOutcome::InstallFiles(o) => self.render_install(o),
            PhaseOutcome::ConfigureSystem(o) => self.render_configure(o),
            PhaseOutcome::FinishInstallation(o) => self.render_finish(o),
        }
    }

    /// Render the environment check.
    pub fn render_check(&self, outcome: &CheckEnvironmentOutcome) {
        if self.ctx.quiet {
            return;
        }
        let snapshot = &outcome.snapshot;
        println!();
        self.ctx.header("Environment");
        println!();
        self.ctx.kv("Runtime:        ", or_missing(snapshot.runtime_version.as_deref()));
        self.ctx.kv("Database client:", or_missing(snapshot.db_client_version.as_deref()));
        self.ctx.kv("Domain:         ", or_missing(snapshot.domain.as_deref()));
        self.ctx.kv("Install path:   ", &snapshot.install_path);
        self.ctx.kv("Under web root: ", yes_no(snapshot.under_web_root));
        self.ctx.kv("Hosting panel:  ", yes_no(snapshot.platform_detected));
        println!();

        if snapshot.violations.is_empty() {
            self.ctx.success("All prerequisites met");
        } else {
            for violation in &snapshot.violations {
                if violation.is_blocking() {
                    self.print_check(false, &violation.message);
                } else {
                    self.ctx.warn(&violation.message);
                }
            }
        }
        println!();
    }

    /// Render the isolated environment and dependency installation.
    pub fn render_install(&self, outcome: &InstallFilesOutcome) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Dependencies");
        println!();
        self.print_check(outcome.env_created, "Isolated environment");
        if !outcome.env_created && !outcome.env_output.is_empty() {
            self.print_detail(&outcome.env_output);
        }
        for line in &outcome.dependency_log.lines {
            self.print_check(!line.ends_with("FAILED"), line);
        }
        println!();
        self.print_summary(outcome.succeeded, "Dependencies installed", "Dependency installation failed");
    }

    /// Render database provisioning and the written artifacts.
    pub fn render_configure(&self, outcome: &ConfigureOutcome) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Configuration");
        println!();
        match &outcome.db_setup_result {
            DatabaseSetupResult::Provisioned { log, .. } => {
                self.print_check(true, "Database provisioned");
                for line in log {
                    self.print_detail(line);
                }
            }
            DatabaseSetupResult::ManualSetupRequired { message } => self.ctx.warn(message),
            DatabaseSetupResult::NotAttempted => {
                self.print_check(false, "Database setup not attempted");
            }
        }
        self.print_check(outcome.env_file_written, "Environment file");
        self.render_command("Database schema", &outcome.schema_init);
        self.print_check(outcome.service_unit_written, "Service unit");
        self.print_check(outcome.readme_written, "Installation notes");
        if let Some(written) = outcome.proxy_config_written {
            self.print_check(written, "Reverse proxy files");
        }
        for error in &outcome.errors {
            self.ctx.error(error);
        }
        println!();
        self.ctx.kv("Admin email:   ", &outcome.admin_email);
        self.ctx.kv("Admin password:", &outcome.admin_password);
        println!();
        self.print_summary(outcome.succeeded, "System configured", "Configuration incomplete");
    }

    /// Render the final redirect.
    pub fn render_finish(&self, outcome: &FinishOutcome) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.print_summary(outcome.succeeded, &outcome.message, &outcome.message);
        self.ctx.kv("Next:", &outcome.redirect_target);
        println!();
    }

    fn render_command(&self, label: &str, result: &CommandResult) {
        if result.timed_out {
            self.print_check(false, &format!("{label} (timed out)"));
        } else {
            self.print_check(result.succeeded, label);
        }
        if !result.succeeded && !result.output.is_empty() {
            self.print_detail(&result.output);
        }
    }

    fn print_summary(&self, succeeded: bool, ok: &str, failed: &str) {
        if succeeded {
            self.ctx.success(ok);
        } else {
            self.ctx.error(failed);
        }
    }

    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "\u{2713}".style(self.ctx.styles.success));
        } else {
            println!("    {} {msg}", "\u{2717}".style(self.ctx.styles.error));
        }
    }

    fn print_detail(&self, text: &str) {
        for line in text.lines() {
            println!("      {}", line.style(self.ctx.styles.dim));
        }
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

#[must_use]
pub fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or("not found")
}

#[must_use]
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
