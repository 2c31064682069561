//! Application context: unified state passed to every command handler.
//!
//! `AppContext` resolves the install location, loads the installer
//! configuration and owns the production port implementations, so command
//! handlers only decide what to run and how to render it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use installer_common::PhaseOutcome;

use crate::application::ports::{ConfigStore, ProgressReporter};
use crate::application::services::phases::InstallContext;
use crate::domain::InstallerConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::{HostFs, installer_location};
use crate::output::human::HumanRenderer;
use crate::output::{OutputContext, json};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    /// Override of the detected install path.
    pub install_path: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    pub runner: TokioCommandRunner,
    pub fs: HostFs,
    pub config: InstallerConfig,
    /// Directory the application is installed into.
    pub install_path: PathBuf,
    /// File name of the installer entry point inside `install_path`.
    pub entry_file: String,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the installer location cannot be determined or
    /// the configuration file is unreadable or invalid.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let (exe_dir, exe_name) = installer_location()?;
        let install_path = flags.install_path.clone().unwrap_or(exe_dir);
        let config = YamlConfigStore::new(&install_path).load()?;
        let entry_file = config.app.entry_file.clone().unwrap_or(exe_name);

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            // JSON mode keeps stdout for the JSON body alone.
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            runner: TokioCommandRunner::new(Duration::from_secs(config.timeouts.command_secs)),
            fs: HostFs,
            config,
            install_path,
            entry_file,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Phase context over the production ports.
    #[must_use]
    pub fn install_context<'a, P: ProgressReporter>(
        &'a self,
        reporter: &'a P,
    ) -> InstallContext<'a, TokioCommandRunner, HostFs, P> {
        InstallContext {
            runner: &self.runner,
            fs: &self.fs,
            reporter,
            config: &self.config,
            install_path: &self.install_path,
            entry_file: &self.entry_file,
        }
    }

    /// Render a phase outcome in the active output mode.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, outcome: &PhaseOutcome) -> Result<()> {
        match self.mode {
            OutputMode::Json => println!("{}", json::format_outcome(outcome)?),
            OutputMode::Human => HumanRenderer::new(&self.output).render_phase(outcome),
        }
        Ok(())
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (`--yes` flag or `CI` env), returns
    /// `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool, non_interactive: bool) -> Result<bool> {
        if non_interactive || std::env::var("CI").is_ok() {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
