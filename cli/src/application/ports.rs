//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `installer_common`,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use installer_common::CommandResult;

use crate::domain::InstallerConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Arguments are always passed as a vector, never through a shell command
/// line. Every method is infallible: a program that cannot be started, exits
/// non-zero or runs past its deadline is described by the returned
/// [`CommandResult`].
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program with the runner's default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> CommandResult;
    /// Run a program with a custom timeout override.
    ///
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration)
    -> CommandResult;
    /// Run a program with `dir` as its working directory.
    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> CommandResult;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> CommandResult;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the install-path filesystem operations the provisioners need.
pub trait LocalFs {
    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Whether files can be created inside `dir`.
    fn is_writable(&self, dir: &Path) -> bool;
    /// Create or replace a file.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Create or replace a file readable only by its owner.
    fn write_private(&self, path: &Path, content: &str) -> Result<()>;
    /// Write a scratch file inside `dir`.
    ///
    /// Returns `(path, guard)`; the file is deleted when `guard` is dropped,
    /// whatever happened in between.
    fn write_scratch(
        &self,
        dir: &Path,
        prefix: &str,
        suffix: &str,
        content: &str,
    ) -> Result<(PathBuf, Box<dyn Any + Send>)>;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts loading of the installer configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<InstallerConfig>;
    /// Location of the configuration file.
    fn path(&self) -> PathBuf;
}
