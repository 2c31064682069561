//! Application service: schema initializer.

use std::path::Path;

use installer_common::CommandResult;

use crate::application::ports::{CommandRunner, LocalFs};
use crate::application::services::dependencies::env_bin;
use crate::domain::artifacts::{SCHEMA_SCRIPT_PREFIX, render_schema_bootstrap};
use crate::domain::config::RuntimeConfig;

/// Run the schema bootstrap program through the isolated environment.
///
/// The bootstrap is written to a scratch file inside `install_path` and
/// removed once the interpreter returns, whether it succeeded or not.
pub async fn initialize_schema(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    runtime: &RuntimeConfig,
    install_path: &Path,
) -> CommandResult {
    let python = env_bin(runtime, install_path, "python");
    if !fs.exists(&python) {
        return CommandResult::not_run(format!(
            "isolated environment interpreter not found at {}",
            python.display()
        ));
    }

    let (script, guard) = match fs.write_scratch(
        install_path,
        SCHEMA_SCRIPT_PREFIX,
        ".py",
        render_schema_bootstrap(),
    ) {
        Ok(scratch) => scratch,
        Err(e) => return CommandResult::not_run(format!("cannot write bootstrap script: {e:#}")),
    };

    let python = python.to_string_lossy();
    let script = script.to_string_lossy();
    let result = runner.run_in(install_path, &python, &[&script]).await;
    drop(guard);
    result
}
