use std::fmt;

use serde::{Deserialize, Serialize};

/// One externally triggered step of the install pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    CheckEnvironment,
    InstallFiles,
    ConfigureSystem,
    FinishInstallation,
}

impl Phase {
    /// All phases in pipeline order.
    pub const ALL: [Phase; 4] = [
        Phase::CheckEnvironment,
        Phase::InstallFiles,
        Phase::ConfigureSystem,
        Phase::FinishInstallation,
    ];

    /// Wire name used in the `action` discriminator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::CheckEnvironment => "check_environment",
            Phase::InstallFiles => "install_files",
            Phase::ConfigureSystem => "configure_system",
            Phase::FinishInstallation => "finish_installation",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of the `configure_system` phase. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigureRequest {
    pub db_name: Option<String>,
    pub db_user: Option<String>,
    /// Generated when absent or empty.
    pub db_password: Option<String>,
    pub db_host: Option<String>,
}

/// Inputs of the `finish_installation` phase.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FinishRequest {
    pub remove_installer: bool,
}

/// A phase request as posted by the wizard, discriminated by `action`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PhaseRequest {
    CheckEnvironment,
    InstallFiles,
    ConfigureSystem(ConfigureRequest),
    FinishInstallation(FinishRequest),
}
