//! Application service: isolated environment and dependency installation.

use std::path::{Path, PathBuf};

use installer_common::{CommandResult, ProvisionLog};

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::domain::config::RuntimeConfig;

/// Root of the isolated environment under the install path.
#[must_use]
pub fn env_dir(runtime: &RuntimeConfig, install_path: &Path) -> PathBuf {
    install_path.join(&runtime.env_dir)
}

/// Path of an executable inside the isolated environment.
#[must_use]
pub fn env_bin(runtime: &RuntimeConfig, install_path: &Path, name: &str) -> PathBuf {
    env_dir(runtime, install_path).join("bin").join(name)
}

/// Create (or refresh) the isolated environment. Safe to repeat.
pub async fn create_isolated_environment(
    runner: &impl CommandRunner,
    runtime: &RuntimeConfig,
    install_path: &Path,
) -> CommandResult {
    let target = env_dir(runtime, install_path);
    let target = target.to_string_lossy();
    runner.run(&runtime.program, &["-m", "venv", &target]).await
}

/// Install every manifest package, one installer call per package.
///
/// Best-effort: a failed package is logged and the next one is still
/// attempted. `ProvisionLog::succeeded` is the AND over all packages.
pub async fn install_dependencies(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    manifest: &[String],
    runtime: &RuntimeConfig,
    install_path: &Path,
) -> ProvisionLog {
    let pip = env_bin(runtime, install_path, "pip");
    let pip = pip.to_string_lossy();
    let mut log = ProvisionLog::new();
    for package in manifest {
        reporter.step(&format!("installing {package}..."));
        let result = runner.run(&pip, &["install", package]).await;
        if !result.succeeded {
            reporter.warn(&format!("{package} failed to install"));
        }
        log.record(package, &result);
    }
    log
}
