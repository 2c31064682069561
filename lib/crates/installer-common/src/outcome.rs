//! Per-phase result records returned to the wizard.
//!
//! Every record carries a top-level `succeeded` flag; sub-results that are
//! purely informational never feed into it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phase::Phase;
use crate::types::{CommandResult, EnvironmentSnapshot, ProvisionLog};

/// Result of `check_environment`. Detection gaps are reported, never fatal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckEnvironmentOutcome {
    pub succeeded: bool,
    #[serde(flatten)]
    pub snapshot: EnvironmentSnapshot,
}

/// Result of `install_files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstallFilesOutcome {
    pub succeeded: bool,
    pub env_created: bool,
    /// Output of the environment-creation command.
    pub env_output: String,
    pub dependency_log: ProvisionLog,
    pub install_path: String,
}

/// What the database provisioner did.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DatabaseSetupResult {
    /// Privileged provisioning was attempted. Creation commands are
    /// best-effort; their output is kept in `log`.
    #[serde(rename_all = "camelCase")]
    Provisioned {
        role_created: bool,
        database_created: bool,
        log: Vec<String>,
    },
    /// No privileged context on this host; the operator has to create the
    /// role and database by hand.
    ManualSetupRequired { message: String },
    /// Provisioning never started because the credentials could not be
    /// resolved; the reason is in the phase's `errors`.
    NotAttempted,
}

impl DatabaseSetupResult {
    #[must_use]
    pub fn is_manual(&self) -> bool {
        matches!(self, DatabaseSetupResult::ManualSetupRequired { .. })
    }
}

/// Result of `configure_system`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureOutcome {
    /// env file AND schema init AND service unit AND readme.
    pub succeeded: bool,
    pub db_setup_result: DatabaseSetupResult,
    pub env_file_written: bool,
    pub schema_init: CommandResult,
    pub service_unit_written: bool,
    pub readme_written: bool,
    /// Reverse-proxy files; only attempted for panel-hosted installs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_config_written: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub admin_email: String,
    pub admin_password: String,
    /// Write failures and other diagnostics, in the order they happened.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Result of `finish_installation`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FinishOutcome {
    pub succeeded: bool,
    pub message: String,
    pub redirect_target: String,
}

/// Any phase result, serialized as the bare record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PhaseOutcome {
    CheckEnvironment(CheckEnvironmentOutcome),
    InstallFiles(InstallFilesOutcome),
    ConfigureSystem(ConfigureOutcome),
    FinishInstallation(FinishOutcome),
}

impl PhaseOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        match self {
            PhaseOutcome::CheckEnvironment(o) => o.succeeded,
            PhaseOutcome::InstallFiles(o) => o.succeeded,
            PhaseOutcome::ConfigureSystem(o) => o.succeeded,
            PhaseOutcome::FinishInstallation(o) => o.succeeded,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            PhaseOutcome::CheckEnvironment(_) => Phase::CheckEnvironment,
            PhaseOutcome::InstallFiles(_) => Phase::InstallFiles,
            PhaseOutcome::ConfigureSystem(_) => Phase::ConfigureSystem,
            PhaseOutcome::FinishInstallation(_) => Phase::FinishInstallation,
        }
    }
}

/// Success flag of one phase inside an [`InstallRecord`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseStatus {
    pub phase: Phase,
    pub succeeded: bool,
}

/// Summary written after a headless run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallRecord {
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub environment: EnvironmentSnapshot,
    pub phases: Vec<PhaseStatus>,
    pub succeeded: bool,
}
