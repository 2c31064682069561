//! Installer configuration schema and validation.
//!
//! Pure types only; loading lives in `crate::infra::config`.

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::requirements::{RequirementCatalog, parse_version};

/// Top-level configuration stored in `installer.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InstallerConfig {
    pub app: AppConfig,
    pub runtime: RuntimeConfig,
    pub database: DatabaseConfig,
    pub platform: PlatformConfig,
    pub timeouts: TimeoutConfig,
}

/// The application being installed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Human-readable product name used in the unit and readme.
    pub name: String,
    /// Base name of the generated `<service_name>.service` unit.
    pub service_name: String,
    /// WSGI entry point handed to gunicorn.
    pub entry_point: String,
    pub port: u16,
    pub workers: u16,
    pub worker_timeout_secs: u32,
    pub service_user: String,
    /// Default administrator created by the application's own seed data.
    pub admin_email: String,
    pub admin_password: String,
    pub support_email: String,
    pub support_phone: String,
    pub readme_file: String,
    /// Installer entry point file name; `None` means the running binary.
    pub entry_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Sistema de Gestão Agropecuária".to_string(),
            service_name: "fazenda".to_string(),
            entry_point: "main:app".to_string(),
            port: 5000,
            workers: 2,
            worker_timeout_secs: 60,
            service_user: "www-data".to_string(),
            admin_email: "admin@fazenda.com".to_string(),
            admin_password: "admin".to_string(),
            support_email: "suporte@ruralsys.com.br".to_string(),
            support_phone: "(11) 1234-5678".to_string(),
            readme_file: "INSTALACAO.md".to_string(),
            entry_file: None,
        }
    }
}

/// Language runtime and dependency manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub program: String,
    pub min_version: String,
    /// Standard-library modules the runtime must be able to import.
    pub required_modules: Vec<String>,
    /// Isolated environment directory, relative to the install path.
    pub env_dir: String,
    /// Packages installed into the isolated environment, in order.
    pub packages: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            min_version: "3.8.0".to_string(),
            required_modules: ["venv", "ensurepip", "ssl"].map(String::from).to_vec(),
            env_dir: "venv".to_string(),
            packages: [
                "flask",
                "flask-login",
                "flask-sqlalchemy",
                "flask-wtf",
                "gunicorn",
                "psycopg2-binary",
                "werkzeug",
                "pandas",
                "xlsxwriter",
                "email-validator",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Database server access and credential defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub client: String,
    pub superuser: String,
    /// Program used to run the client as `superuser`.
    pub privilege_program: String,
    pub default_name: String,
    pub default_user: String,
    pub default_host: String,
    pub password_length: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            client: "psql".to_string(),
            superuser: "postgres".to_string(),
            privilege_program: "sudo".to_string(),
            default_name: "fazenda".to_string(),
            default_user: "fazenda".to_string(),
            default_host: "localhost".to_string(),
            password_length: 12,
        }
    }
}

/// Hosting-panel conventions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlatformConfig {
    /// Path whose presence means the control panel is installed.
    pub panel_marker: String,
    /// Directory name of the web-served document root.
    pub web_root_dir: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            panel_marker: "/usr/local/CyberCP".to_string(),
            web_root_dir: "public_html".to_string(),
        }
    }
}

/// Deadlines for external commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Version and presence probes.
    pub probe_secs: u64,
    /// Provisioning commands (environment creation, package installs, SQL).
    pub command_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_secs: 15,
            command_secs: 600,
        }
    }
}

impl InstallerConfig {
    /// Check the values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if parse_version(&self.runtime.min_version).is_none() {
            return Err(ConfigError::InvalidMinVersion(self.runtime.min_version.clone()));
        }
        if self.runtime.packages.is_empty() {
            return Err(ConfigError::EmptyManifest);
        }
        if self.app.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "app.port",
                value: "0".to_string(),
                expected: "a port between 1 and 65535",
            });
        }
        if self.database.password_length < 8 {
            return Err(ConfigError::InvalidValue {
                key: "database.password_length",
                value: self.database.password_length.to_string(),
                expected: "at least 8",
            });
        }
        if self.timeouts.probe_secs == 0 || self.timeouts.command_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeouts",
                value: format!(
                    "probe_secs={}, command_secs={}",
                    self.timeouts.probe_secs, self.timeouts.command_secs
                ),
                expected: "non-zero seconds",
            });
        }
        Ok(())
    }

    /// Requirement catalog derived from this configuration.
    #[must_use]
    pub fn requirement_catalog(&self) -> RequirementCatalog {
        RequirementCatalog {
            runtime_program: self.runtime.program.clone(),
            min_runtime_version: self.runtime.min_version.clone(),
            required_modules: self.runtime.required_modules.clone(),
            panel_marker: self.platform.panel_marker.clone(),
        }
    }

    /// Whether the administrator password is still the shipped default.
    #[must_use]
    pub fn uses_default_admin_password(&self) -> bool {
        self.app.admin_password == AppConfig::default().admin_password
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
