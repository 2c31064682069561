use serde::{Deserialize, Serialize};

/// Outcome of a single external command invocation.
///
/// Stdout and stderr are merged into `output` in the order the process
/// wrote them. A non-zero exit is a normal outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub succeeded: bool,
    pub output: String,
    /// `None` when the process was killed (timeout or signal).
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub timed_out: bool,
}

impl CommandResult {
    /// Build a result from an exit code; only `0` counts as success.
    #[must_use]
    pub fn exited(exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            succeeded: exit_code == Some(0),
            output: output.into(),
            exit_code,
            timed_out: false,
        }
    }

    /// Build the result of a command that exceeded its deadline.
    #[must_use]
    pub fn timed_out(output: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: output.into(),
            exit_code: None,
            timed_out: true,
        }
    }

    /// Build a failed result for a step that could not run at all.
    #[must_use]
    pub fn not_run(reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: reason.into(),
            exit_code: None,
            timed_out: false,
        }
    }
}

/// Per-package log of a dependency installation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionLog {
    /// Logical AND of every package outcome. `true` for an empty run.
    pub succeeded: bool,
    /// One status line per attempted package, in manifest order.
    pub lines: Vec<String>,
    /// Full command output for each package, aligned with `lines`.
    pub details: Vec<String>,
}

impl ProvisionLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            succeeded: true,
            lines: Vec::new(),
            details: Vec::new(),
        }
    }

    /// Record one package attempt. A failure never stops later records.
    pub fn record(&mut self, package: &str, result: &CommandResult) {
        let status = if result.succeeded { "OK" } else { "FAILED" };
        self.lines.push(format!("Installing {package}: {status}"));
        self.details.push(result.output.clone());
        self.succeeded = self.succeeded && result.succeeded;
    }
}

/// Category of a prerequisite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RequirementKind {
    RuntimeVersion,
    Extension,
    DirectoryWritable,
    HostEnvironment,
}

/// A single entry of the prerequisite catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub description: String,
}

/// A prerequisite the host does not meet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequirementViolation {
    pub requirement: Requirement,
    pub message: String,
}

impl RequirementViolation {
    /// Host-environment violations are advisory; everything else blocks.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.requirement.kind != RequirementKind::HostEnvironment
    }
}

/// What the `check_environment` phase found on the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_client_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub install_path: String,
    pub under_web_root: bool,
    pub platform_detected: bool,
    pub violations: Vec<RequirementViolation>,
}
