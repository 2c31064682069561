//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags, OutputMode};
use crate::commands;

/// Browser-driven installer for the farm management system
#[derive(Parser)]
#[command(
    name = "fazenda-install",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Directory to install into (default: the installer's own directory)
    #[arg(long, global = true, env = "FAZENDA_INSTALLER_INSTALL_PATH")]
    pub install_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the installation wizard in the browser
    Serve(commands::serve::ServeArgs),

    /// Check the environment and prerequisites
    Check,

    /// Create the isolated environment and install dependencies
    Install,

    /// Provision the database and write configuration files
    Configure(commands::configure::ConfigureArgs),

    /// Finish the installation
    Finish(commands::finish::FinishArgs),

    /// Run every phase in order
    Run(commands::run::RunArgs),

    /// Show version
    Version,
}

impl Command {
    /// Whether this command runs the long-lived HTTP server.
    #[must_use]
    pub fn is_server(&self) -> bool {
        matches!(self, Command::Serve(_))
    }
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the installer cannot be set up or the command
    /// fails outside of a phase.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            install_path,
            command,
        } = self;

        if let Command::Version = command {
            commands::version::run(if json {
                OutputMode::Json
            } else {
                OutputMode::Human
            });
            return Ok(ExitCode::SUCCESS);
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            install_path,
        })?;

        let succeeded = match command {
            Command::Serve(args) => {
                commands::serve::run(app, &args).await?;
                true
            }
            Command::Check => commands::check::run(&app).await?,
            Command::Install => commands::install::run(&app).await?,
            Command::Configure(args) => commands::configure::run(&app, args).await?,
            Command::Finish(args) => commands::finish::run(&app, &args).await?,
            Command::Run(args) => commands::run::run(&app, args).await?,
            Command::Version => true,
        };

        Ok(if succeeded {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
