//! `YamlConfigStore` against real files in a temp directory.
//!
//! Every test is `#[serial]`: the override variable is process-global.

#![allow(unsafe_code)]

use fazenda_installer::application::ports::ConfigStore;
use fazenda_installer::domain::InstallerConfig;
use fazenda_installer::infra::config::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, YamlConfigStore};
use serial_test::serial;
use tempfile::TempDir;

fn store_with(content: Option<&str>) -> (TempDir, YamlConfigStore) {
    let dir = TempDir::new().expect("tempdir");
    if let Some(content) = content {
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), content).expect("write config");
    }
    let store = YamlConfigStore::new(dir.path());
    (dir, store)
}

#[test]
#[serial]
fn missing_file_yields_defaults() {
    let (_dir, store) = store_with(None);
    assert_eq!(store.load().expect("load"), InstallerConfig::default());
}

#[test]
#[serial]
fn partial_file_keeps_remaining_defaults() {
    let (_dir, store) = store_with(Some(
        "app:\n  port: 8000\n  admin_password: s3cret-pass\nruntime:\n  packages: [flask]\n",
    ));

    let config = store.load().expect("load");

    assert_eq!(config.app.port, 8000);
    assert!(!config.uses_default_admin_password());
    assert_eq!(config.runtime.packages, vec!["flask".to_string()]);
    assert_eq!(config.runtime.program, "python3");
    assert_eq!(config.database, InstallerConfig::default().database);
}

#[test]
#[serial]
fn malformed_yaml_names_the_file() {
    let (dir, store) = store_with(Some("app: [unterminated\n"));

    let err = store.load().expect_err("malformed yaml");
    let message = format!("{err:#}");

    assert!(message.contains("cannot parse"), "got: {message}");
    assert!(
        message.contains(&dir.path().join(CONFIG_FILE_NAME).display().to_string()),
        "got: {message}"
    );
}

#[test]
#[serial]
fn invalid_values_are_rejected() {
    let (_dir, store) = store_with(Some("database:\n  password_length: 4\n"));

    let message = format!("{:#}", store.load().expect_err("too short"));

    assert!(message.contains("invalid configuration"), "got: {message}");
    assert!(message.contains("database.password_length"), "got: {message}");
}

#[test]
#[serial]
fn env_var_overrides_location() {
    let (_dir, store) = store_with(Some("app:\n  port: 8000\n"));
    let other = TempDir::new().expect("tempdir");
    let custom = other.path().join("custom.yaml");
    std::fs::write(&custom, "app:\n  port: 9100\n").expect("write");

    // SAFETY: serialized by #[serial]
    unsafe { std::env::set_var(CONFIG_ENV_VAR, &custom) };
    let path = store.path();
    let loaded = store.load();
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    assert_eq!(path, custom);
    assert_eq!(loaded.expect("load").app.port, 9100);
}
