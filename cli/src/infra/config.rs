//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::InstallerConfig;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "FAZENDA_INSTALLER_CONFIG";

/// Configuration file name looked up inside the install path.
pub const CONFIG_FILE_NAME: &str = "installer.yaml";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    install_path: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(install_path: impl Into<PathBuf>) -> Self {
        Self {
            install_path: install_path.into(),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<InstallerConfig> {
        let path = self.path();
        let config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?
        } else {
            InstallerConfig::default()
        };
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    fn path(&self) -> PathBuf {
        if let Ok(val) = std::env::var(CONFIG_ENV_VAR) {
            return PathBuf::from(val);
        }
        self.install_path.join(CONFIG_FILE_NAME)
    }
}
