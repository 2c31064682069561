//! Environment prober against scripted hosts.

use std::time::Duration;

use fazenda_installer::application::services::environment::EnvironmentProber;
use installer_common::RequirementKind;

use crate::mocks::{ENTRY_FILE, MemFs, ScriptedRunner, fail, install_path, ok, test_config};

#[tokio::test]
async fn absent_runtime_skips_version_query() {
    let config = test_config();
    let runner = ScriptedRunner::nothing_installed();
    let fs = MemFs::new();
    let prober = EnvironmentProber::new(&runner, &fs, &config);

    assert_eq!(prober.detect_runtime_version().await, None);
    assert_eq!(runner.lines(), vec!["which python3".to_string()]);
}

#[tokio::test]
async fn probes_use_probe_timeout() {
    let config = test_config();
    let runner = ScriptedRunner::healthy_host();
    let fs = MemFs::new();
    let prober = EnvironmentProber::new(&runner, &fs, &config);

    prober.detect_db_client_version().await;

    for call in runner.calls() {
        assert_eq!(call.timeout, Some(Duration::from_secs(config.timeouts.probe_secs)));
    }
}

#[tokio::test]
async fn versions_are_extracted() {
    let config = test_config();
    let runner = ScriptedRunner::healthy_host();
    let fs = MemFs::new();
    let prober = EnvironmentProber::new(&runner, &fs, &config);

    assert_eq!(prober.detect_runtime_version().await.as_deref(), Some("3.11.4"));
    assert_eq!(prober.detect_db_client_version().await.as_deref(), Some("14.9"));
}

#[tokio::test]
async fn unparsable_version_is_absent() {
    let config = test_config();
    let runner = ScriptedRunner::all_succeed().on("python3 --version", ok("Python unknown"));
    let fs = MemFs::new();
    let prober = EnvironmentProber::new(&runner, &fs, &config);

    assert_eq!(prober.detect_runtime_version().await, None);
}

#[tokio::test]
async fn missing_modules_are_listed_in_order() {
    let config = test_config();
    let runner = ScriptedRunner::all_succeed()
        .on("import venv", fail(1, "ModuleNotFoundError: No module named 'venv'"))
        .on("import ssl", fail(1, "ModuleNotFoundError: No module named 'ssl'"));
    let fs = MemFs::new();
    let prober = EnvironmentProber::new(&runner, &fs, &config);

    assert_eq!(prober.missing_modules().await, vec!["venv".to_string(), "ssl".to_string()]);
}

#[tokio::test]
async fn snapshot_of_panel_host() {
    let config = test_config();
    let runner = ScriptedRunner::healthy_host();
    let fs = MemFs::new().with_path(&config.platform.panel_marker);
    let prober = EnvironmentProber::new(&runner, &fs, &config);

    let snapshot = prober.snapshot(&install_path(), ENTRY_FILE).await;

    assert_eq!(snapshot.runtime_version.as_deref(), Some("3.11.4"));
    assert_eq!(snapshot.db_client_version.as_deref(), Some("14.9"));
    assert_eq!(snapshot.domain.as_deref(), Some("example.com"));
    assert!(snapshot.under_web_root);
    assert!(snapshot.platform_detected);
    assert!(snapshot.violations.is_empty(), "{:?}", snapshot.violations);
}

#[tokio::test]
async fn snapshot_without_runtime_reports_but_skips_imports() {
    let config = test_config();
    let runner = ScriptedRunner::nothing_installed();
    let fs = MemFs::new().read_only();
    let prober = EnvironmentProber::new(&runner, &fs, &config);

    let snapshot = prober.snapshot(&install_path(), ENTRY_FILE).await;

    assert_eq!(runner.count("import venv"), 0);
    let kinds: Vec<RequirementKind> = snapshot.violations.iter().map(|v| v.requirement.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RequirementKind::RuntimeVersion,
            RequirementKind::DirectoryWritable,
            RequirementKind::HostEnvironment,
        ]
    );
}
