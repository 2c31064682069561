//! Prerequisite catalog and validator.
//!
//! Pure functions only; the facts are gathered by the environment prober.

use std::cmp::Ordering;

use installer_common::{Requirement, RequirementKind, RequirementViolation};
use semver::Version;

/// Static requirement metadata, built from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementCatalog {
    pub runtime_program: String,
    pub min_runtime_version: String,
    pub required_modules: Vec<String>,
    pub panel_marker: String,
}

/// What the prober observed on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    /// Raw version string, `None` when the runtime is absent.
    pub runtime_version: Option<String>,
    pub missing_modules: Vec<String>,
    pub install_dir: String,
    pub install_dir_writable: bool,
    pub platform_detected: bool,
}

impl RequirementCatalog {
    fn runtime_requirement(&self) -> Requirement {
        Requirement {
            kind: RequirementKind::RuntimeVersion,
            description: format!("{} {} or newer", self.runtime_program, self.min_runtime_version),
        }
    }

    fn module_requirement(&self, module: &str) -> Requirement {
        Requirement {
            kind: RequirementKind::Extension,
            description: format!("{} module '{module}'", self.runtime_program),
        }
    }

    fn writable_requirement() -> Requirement {
        Requirement {
            kind: RequirementKind::DirectoryWritable,
            description: "Writable install directory".to_string(),
        }
    }

    fn panel_requirement(&self) -> Requirement {
        Requirement {
            kind: RequirementKind::HostEnvironment,
            description: format!("Hosting panel at {}", self.panel_marker),
        }
    }
}

/// Parse `MAJOR.MINOR[.PATCH]` into a comparable version.
///
/// Two-component versions are padded with a zero patch level. Anything
/// else, including pre-release suffixes, yields `None`.
#[must_use]
pub fn parse_version(raw: &str) -> Option<Version> {
    let parts: Vec<u64> = raw
        .trim()
        .split('.')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [major, minor] => Some(Version::new(*major, *minor, 0)),
        [major, minor, patch] => Some(Version::new(*major, *minor, *patch)),
        _ => None,
    }
}

/// Numeric comparison of two version strings; `None` if either is unreadable.
#[must_use]
pub fn compare_versions(installed: &str, minimum: &str) -> Option<Ordering> {
    Some(parse_version(installed)?.cmp(&parse_version(minimum)?))
}

/// Collect every unmet prerequisite, in catalog order.
///
/// Never fails: unreadable versions are reported as violations. The panel
/// check is advisory ([`RequirementViolation::is_blocking`] is `false`).
#[must_use]
pub fn validate(catalog: &RequirementCatalog, facts: &HostFacts) -> Vec<RequirementViolation> {
    let mut violations = Vec::new();

    if let Some(message) = runtime_violation(catalog, facts.runtime_version.as_deref()) {
        violations.push(RequirementViolation {
            requirement: catalog.runtime_requirement(),
            message,
        });
    }

    for module in &catalog.required_modules {
        if facts.missing_modules.contains(module) {
            violations.push(RequirementViolation {
                requirement: catalog.module_requirement(module),
                message: format!(
                    "{}: the module '{module}' is required and could not be imported.",
                    catalog.runtime_program
                ),
            });
        }
    }

    if !facts.install_dir_writable {
        violations.push(RequirementViolation {
            requirement: RequirementCatalog::writable_requirement(),
            message: format!("Permissions: the directory {} is not writable.", facts.install_dir),
        });
    }

    if !facts.platform_detected {
        violations.push(RequirementViolation {
            requirement: catalog.panel_requirement(),
            message: "Environment: hosting panel not detected. The installer can still run, \
                      but database provisioning has to be done manually."
                .to_string(),
        });
    }

    violations
}

fn runtime_violation(catalog: &RequirementCatalog, installed: Option<&str>) -> Option<String> {
    let program = &catalog.runtime_program;
    let minimum = &catalog.min_runtime_version;
    let Some(installed) = installed else {
        return Some(format!(
            "{program}: not found. Version {minimum} or newer is required."
        ));
    };
    match compare_versions(installed, minimum) {
        Some(Ordering::Less) => Some(format!(
            "{program}: the minimum required version is {minimum}. Your version is {installed}."
        )),
        Some(_) => None,
        None => Some(format!(
            "{program}: could not compare version '{installed}' against the minimum {minimum}."
        )),
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
