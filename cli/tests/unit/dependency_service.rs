//! Dependency provisioner: isolated environment and per-package installs.

use fazenda_installer::application::services::dependencies::{
    create_isolated_environment, install_dependencies,
};

use crate::mocks::{NoopReporter, RecordingReporter, ScriptedRunner, fail, install_path, test_config};

fn manifest(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn environment_is_created_under_install_path() {
    let config = test_config();
    let runner = ScriptedRunner::all_succeed();

    let result = create_isolated_environment(&runner, &config.runtime, &install_path()).await;

    assert!(result.succeeded);
    assert_eq!(
        runner.lines(),
        vec![format!("python3 -m venv {}/venv", install_path().display())]
    );
}

#[tokio::test]
async fn failing_package_does_not_stop_the_rest() {
    let config = test_config();
    let packages = manifest(&["flask", "pandas", "gunicorn", "xlsxwriter"]);
    let runner = ScriptedRunner::all_succeed().on(
        "pip install pandas",
        fail(1, "ERROR: Could not find a version that satisfies the requirement pandas"),
    );
    let reporter = RecordingReporter::default();

    let log = install_dependencies(&runner, &reporter, &packages, &config.runtime, &install_path()).await;

    assert!(!log.succeeded);
    assert_eq!(log.lines.len(), packages.len());
    assert_eq!(log.details.len(), packages.len());
    assert_eq!(log.lines[1], "Installing pandas: FAILED");
    assert_eq!(log.lines[3], "Installing xlsxwriter: OK");
    for package in &packages {
        assert_eq!(runner.count(&format!("pip install {package}")), 1, "{package} attempted once");
    }
    assert_eq!(reporter.warnings(), vec!["pandas failed to install".to_string()]);
}

#[tokio::test]
async fn installs_use_environment_pip() {
    let config = test_config();
    let runner = ScriptedRunner::all_succeed();

    let log = install_dependencies(
        &runner,
        &NoopReporter,
        &manifest(&["flask-login"]),
        &config.runtime,
        &install_path(),
    )
    .await;

    assert!(log.succeeded);
    assert_eq!(runner.calls()[0].program, format!("{}/venv/bin/pip", install_path().display()));
    assert_eq!(runner.calls()[0].args, vec!["install", "flask-login"]);
}

#[tokio::test]
async fn empty_manifest_succeeds_without_calls() {
    let config = test_config();
    let runner = ScriptedRunner::nothing_installed();

    let log = install_dependencies(&runner, &NoopReporter, &[], &config.runtime, &install_path()).await;

    assert!(log.succeeded);
    assert!(log.lines.is_empty());
    assert!(runner.calls().is_empty());
}
