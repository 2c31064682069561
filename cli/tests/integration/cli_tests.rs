//! Integration tests for the installer binary.
//!
//! Every command runs against a fresh temp directory passed as
//! `--install-path`, so nothing outside it is touched.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn installer() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fazenda-install"));
    cmd.env("NO_COLOR", "1")
        .env_remove("FAZENDA_INSTALLER_CONFIG")
        .env_remove("FAZENDA_INSTALLER_INSTALL_PATH")
        .env_remove("FAZENDA_DB_PASSWORD");
    cmd
}

fn installer_in(dir: &TempDir) -> Command {
    let mut cmd = installer();
    cmd.arg("--install-path").arg(dir.path());
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is a single JSON document")
}

// --- Help and version ---

#[test]
fn test_cli_no_args_shows_help() {
    installer().assert().code(2).stderr(predicate::str::contains(
        "Browser-driven installer for the farm management system",
    ));
}

#[test]
fn test_cli_help_lists_every_phase_command() {
    let output = installer().arg("--help").output().expect("runs");
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for command in ["serve", "check", "install", "configure", "finish", "run"] {
        assert!(help.contains(command), "missing `{command}` in:\n{help}");
    }
}

#[test]
fn test_cli_version_flag_shows_version() {
    installer()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fazenda-install"));
}

#[test]
fn test_version_command_shows_version() {
    installer()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "fazenda-install {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = installer()
        .args(["version", "--json"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_exits_with_error() {
    installer()
        .arg("rollback")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_configure_help_shows_database_flags() {
    installer()
        .args(["configure", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--db-name"))
        .stdout(predicate::str::contains("--db-password"));
}

// --- Phases ---

#[test]
fn test_check_json_always_succeeds() {
    let dir = TempDir::new().expect("tempdir");

    let output = installer_in(&dir)
        .args(["check", "--json"])
        .output()
        .expect("runs");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["succeeded"], true);
    assert_eq!(json["installPath"], dir.path().to_string_lossy().as_ref());
    assert!(json["violations"].is_array());
}

#[test]
fn test_check_human_output() {
    let dir = TempDir::new().expect("tempdir");
    installer_in(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment"))
        .stdout(predicate::str::contains(dir.path().to_string_lossy().as_ref()));
}

#[test]
fn test_finish_without_removal_writes_nothing() {
    let dir = TempDir::new().expect("tempdir");

    let output = installer_in(&dir)
        .args(["finish", "--json"])
        .output()
        .expect("runs");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["succeeded"], true);
    assert_eq!(json["message"], "Installation complete.");
    assert!(!dir.path().join("remove-installer.sh").exists());
}

#[test]
fn test_finish_with_removal_runs_cleanup_script() {
    let dir = TempDir::new().expect("tempdir");
    let entry = dir.path().join("fazenda-install");
    std::fs::write(&entry, "#!/bin/sh\n").expect("write entry");

    let output = installer_in(&dir)
        .args(["finish", "--remove-installer", "--json"])
        .output()
        .expect("runs");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["redirectTarget"], "cleanup");
    assert!(!entry.exists(), "installer entry point removed");
    assert!(!dir.path().join("remove-installer.sh").exists());
}

// --- Configuration ---

#[test]
fn test_invalid_config_exits_one() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("installer.yaml"), "app:\n  port: 0\n").expect("write");

    installer_in(&dir)
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"))
        .stderr(predicate::str::contains("app.port"));
}

#[test]
fn test_invalid_config_json_error_body() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("installer.yaml"), "runtime: [").expect("write");

    let output = installer_in(&dir)
        .args(["check", "--json"])
        .output()
        .expect("runs");

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["error"], true);
    assert_eq!(json["code"], "INSTALLER_ERROR");
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("cannot parse"))
    );
}

#[test]
fn test_config_env_var_points_elsewhere() {
    let dir = TempDir::new().expect("tempdir");
    let other = TempDir::new().expect("tempdir");
    let custom = other.path().join("custom.yaml");
    std::fs::write(&custom, "timeouts:\n  probe_secs: 0\n").expect("write");

    installer_in(&dir)
        .env("FAZENDA_INSTALLER_CONFIG", &custom)
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("custom.yaml"));
}

#[test]
fn test_run_json_is_non_interactive() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("installer.yaml"),
        "runtime:\n  program: definitely-not-a-python\n",
    )
    .expect("write");

    let output = installer_in(&dir)
        .args(["run", "--json"])
        .output()
        .expect("runs");

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    let outcomes = json["outcomes"].as_array().expect("outcomes array");
    assert_eq!(outcomes.len(), 2, "stops after the failed install phase");
    assert_eq!(outcomes[1]["envCreated"], false);
    assert_eq!(json["record"]["succeeded"], false);
    assert!(dir.path().join("install-record.json").exists());
}
