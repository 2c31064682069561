//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use installer_common::CommandResult;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::application::ports::CommandRunner;

/// Default timeout for provisioning commands (package installs can be slow).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(600);

/// Exit code reported when a program cannot be started at all.
pub const NOT_FOUND_EXIT_CODE: i32 = 127;

/// Runs the program named by `$0` with the remaining positional parameters,
/// stderr folded into stdout. Nothing is interpolated into the script.
#[cfg(unix)]
const MERGE_STREAMS: &str = r#"exec "$0" "$@" 2>&1"#;

/// Production `CommandRunner`.
///
/// `tokio::time::timeout` around `.output().await` would drop the future but
/// leave the OS process running, so the deadline is raced with
/// `tokio::select!` and the child is killed explicitly.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(program: &str, args: &[&str]) -> tokio::process::Command {
        #[cfg(unix)]
        {
            let mut cmd = tokio::process::Command::new("sh");
            cmd.arg("-c").arg(MERGE_STREAMS).arg(program).args(args);
            cmd
        }
        #[cfg(not(unix))]
        {
            let mut cmd = tokio::process::Command::new(program);
            cmd.args(args);
            cmd
        }
    }

    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        dir: Option<&Path>,
        input: Option<&[u8]>,
        timeout: Duration,
    ) -> CommandResult {
        let mut cmd = Self::command(program, args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        let stdin = if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = match cmd
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(program, error = %e, "failed to spawn");
                return CommandResult::exited(
                    Some(NOT_FOUND_EXIT_CODE),
                    format!("failed to spawn {program}: {e}"),
                );
            }
        };

        let stdin_handle = child.stdin.take();
        let input_owned = input.map(<[u8]>::to_vec);
        let stdin_task = tokio::spawn(async move {
            if let (Some(mut stdin), Some(bytes)) = (stdin_handle, input_owned) {
                let _ = stdin.write_all(&bytes).await;
            }
        });

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let result = tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                let _ = stdin_task.await;
                let output = merge_output(&stdout, &stderr);
                match status {
                    Ok(status) => CommandResult::exited(status.code(), output),
                    Err(e) => CommandResult::not_run(format!("waiting for {program}: {e}")),
                }
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                tracing::warn!(program, timeout_secs = timeout.as_secs(), "command timed out");
                CommandResult::timed_out(format!(
                    "{program} timed out after {}s",
                    timeout.as_secs()
                ))
            }
        };

        tracing::debug!(
            program,
            args = args.len(),
            succeeded = result.succeeded,
            exit_code = ?result.exit_code,
            "command finished"
        );
        result
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> CommandResult {
        self.execute(program, args, None, None, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> CommandResult {
        self.execute(program, args, None, None, timeout).await
    }

    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> CommandResult {
        self.execute(program, args, Some(dir), None, self.timeout)
            .await
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> CommandResult {
        self.execute(program, args, None, Some(input), self.timeout)
            .await
    }
}

/// Stdout followed by whatever still arrived on stderr, trailing newlines
/// trimmed.
fn merge_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim_end();
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(stderr);
    }
    text.trim_end().to_string()
}
