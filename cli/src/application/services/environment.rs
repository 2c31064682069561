//! Application service: environment prober.
//!
//! Read-only: detects tools, versions and path conventions on the host and
//! feeds them to the prerequisite validator. Nothing is cached, because the
//! host changes between phases (e.g. after the isolated environment exists).

use std::path::Path;

use installer_common::EnvironmentSnapshot;

use crate::application::ports::{CommandRunner, LocalFs};
use crate::domain::InstallerConfig;
use crate::domain::environment::{
    detect_domain, extract_db_client_version, extract_runtime_version, is_under_web_root,
};
use crate::domain::requirements::{HostFacts, validate};

/// Detects what the host provides. Cheap to construct; borrow-only.
pub struct EnvironmentProber<'a, R: CommandRunner, F: LocalFs> {
    runner: &'a R,
    fs: &'a F,
    config: &'a InstallerConfig,
}

impl<'a, R: CommandRunner, F: LocalFs> EnvironmentProber<'a, R, F> {
    #[must_use]
    pub fn new(runner: &'a R, fs: &'a F, config: &'a InstallerConfig) -> Self {
        Self { runner, fs, config }
    }

    /// Version of the language runtime, `None` when absent or unparsable.
    pub async fn detect_runtime_version(&self) -> Option<String> {
        self.detect_version(&self.config.runtime.program, extract_runtime_version)
            .await
    }

    /// Version of the database client, `None` when absent or unparsable.
    pub async fn detect_db_client_version(&self) -> Option<String> {
        self.detect_version(&self.config.database.client, extract_db_client_version)
            .await
    }

    /// Presence check first, then a version query parsed by `parse`.
    async fn detect_version(&self, program: &str, parse: fn(&str) -> Option<String>) -> Option<String> {
        let timeout = self.probe_timeout();
        let which = self.runner.run_with_timeout("which", &[program], timeout).await;
        if !which.succeeded {
            return None;
        }
        let version = self
            .runner
            .run_with_timeout(program, &["--version"], timeout)
            .await;
        if !version.succeeded {
            return None;
        }
        parse(&version.output)
    }

    /// Required runtime modules that fail to import.
    pub async fn missing_modules(&self) -> Vec<String> {
        let timeout = self.probe_timeout();
        let mut missing = Vec::new();
        for module in &self.config.runtime.required_modules {
            let import = format!("import {module}");
            let result = self
                .runner
                .run_with_timeout(&self.config.runtime.program, &["-c", &import], timeout)
                .await;
            if !result.succeeded {
                missing.push(module.clone());
            }
        }
        missing
    }

    /// Hostname guessed from the installer's location.
    #[must_use]
    pub fn detect_domain(&self, install_path: &Path, entry_file: &str) -> Option<String> {
        let entry_path = install_path.join(entry_file);
        detect_domain(&entry_path.to_string_lossy(), entry_file)
    }

    #[must_use]
    pub fn is_under_web_root(&self, install_path: &Path) -> bool {
        is_under_web_root(
            &install_path.to_string_lossy(),
            &self.config.platform.web_root_dir,
        )
    }

    #[must_use]
    pub fn is_platform_detected(&self) -> bool {
        self.fs
            .exists(Path::new(&self.config.platform.panel_marker))
    }

    /// Run every probe and the prerequisite validator.
    pub async fn snapshot(&self, install_path: &Path, entry_file: &str) -> EnvironmentSnapshot {
        let runtime_version = self.detect_runtime_version().await;
        let db_client_version = self.detect_db_client_version().await;
        // Import probes are meaningless without an interpreter.
        let missing_modules = if runtime_version.is_some() {
            self.missing_modules().await
        } else {
            Vec::new()
        };
        let platform_detected = self.is_platform_detected();
        let install_dir = install_path.to_string_lossy().into_owned();

        let facts = HostFacts {
            runtime_version: runtime_version.clone(),
            missing_modules,
            install_dir: install_dir.clone(),
            install_dir_writable: self.fs.is_writable(install_path),
            platform_detected,
        };
        let violations = validate(&self.config.requirement_catalog(), &facts);

        EnvironmentSnapshot {
            runtime_version,
            db_client_version,
            domain: self.detect_domain(install_path, entry_file),
            install_path: install_dir,
            under_web_root: self.is_under_web_root(install_path),
            platform_detected,
            violations,
        }
    }

    fn probe_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.config.timeouts.probe_secs)
    }
}
