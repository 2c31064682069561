//! Application service: the installation orchestrator.
//!
//! One function per wizard phase. Phases never return errors: every failure
//! ends up in the outcome record as `succeeded: false` plus diagnostics, so
//! callers can always render a response. Each phase is safe to re-run.

use std::path::{Path, PathBuf};

use chrono::Utc;
use installer_common::{
    CheckEnvironmentOutcome, CommandResult, ConfigureOutcome, ConfigureRequest, DatabaseSetupResult,
    FinishOutcome, FinishRequest, InstallFilesOutcome, InstallRecord, Phase, PhaseOutcome,
    PhaseRequest, ProvisionLog, outcome::PhaseStatus,
};

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter};
use crate::application::services::database::setup_database;
use crate::application::services::dependencies::{create_isolated_environment, install_dependencies};
use crate::application::services::environment::EnvironmentProber;
use crate::application::services::schema::initialize_schema;
use crate::domain::artifacts::{
    CLEANUP_SCRIPT_FILE, ENV_FILE, GUNICORN_CONFIG_FILE, HTACCESS_FILE, INSTALL_RECORD_FILE,
    render_cleanup_script, render_env_file, render_gunicorn_config, render_htaccess,
    render_readme, render_service_unit, service_unit_file,
};
use crate::domain::{DatabaseCredentials, InstallerConfig};

/// Everything a phase needs. Built fresh for each request.
pub struct InstallContext<'a, R, F, P> {
    pub runner: &'a R,
    pub fs: &'a F,
    pub reporter: &'a P,
    pub config: &'a InstallerConfig,
    pub install_path: &'a Path,
    /// File name of the installer entry point inside `install_path`.
    pub entry_file: &'a str,
}

impl<R: CommandRunner, F: LocalFs, P: ProgressReporter> InstallContext<'_, R, F, P> {
    fn prober(&self) -> EnvironmentProber<'_, R, F> {
        EnvironmentProber::new(self.runner, self.fs, self.config)
    }

    fn path_string(&self) -> String {
        self.install_path.to_string_lossy().into_owned()
    }

    fn cleanup_script(&self) -> PathBuf {
        self.install_path.join(CLEANUP_SCRIPT_FILE)
    }

    /// Where the operator should land once installation is done.
    #[must_use]
    pub fn site_url(&self) -> String {
        match self.prober().detect_domain(self.install_path, self.entry_file) {
            Some(domain) => format!("https://{domain}"),
            None => format!("http://localhost:{}", self.config.app.port),
        }
    }
}

/// Probe the host and validate prerequisites. Never fails.
pub async fn check_environment<R, F, P>(ctx: &InstallContext<'_, R, F, P>) -> CheckEnvironmentOutcome
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    ctx.reporter.step("checking environment...");
    let snapshot = ctx.prober().snapshot(ctx.install_path, ctx.entry_file).await;
    for violation in &snapshot.violations {
        ctx.reporter.warn(&violation.message);
    }
    if snapshot.violations.is_empty() {
        ctx.reporter.success("all prerequisites met");
    }
    tracing::info!(
        phase = %Phase::CheckEnvironment,
        violations = snapshot.violations.len(),
        "phase finished"
    );
    CheckEnvironmentOutcome {
        succeeded: true,
        snapshot,
    }
}

/// Create the isolated environment and install the dependency manifest.
///
/// Environment creation is a hard precondition: when it fails no package
/// is attempted and the log stays empty.
pub async fn install_files<R, F, P>(ctx: &InstallContext<'_, R, F, P>) -> InstallFilesOutcome
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    let runtime = &ctx.config.runtime;
    ctx.reporter.step("creating isolated environment...");
    let env = create_isolated_environment(ctx.runner, runtime, ctx.install_path).await;

    let dependency_log = if env.succeeded {
        ctx.reporter.success("isolated environment ready");
        install_dependencies(
            ctx.runner,
            ctx.reporter,
            &runtime.packages,
            runtime,
            ctx.install_path,
        )
        .await
    } else {
        ctx.reporter.warn("failed to create isolated environment");
        ProvisionLog::new()
    };

    let succeeded = env.succeeded && dependency_log.succeeded;
    if succeeded {
        ctx.reporter.success("dependencies installed");
    }
    tracing::info!(phase = %Phase::InstallFiles, succeeded, "phase finished");
    InstallFilesOutcome {
        succeeded,
        env_created: env.succeeded,
        env_output: env.output,
        dependency_log,
        install_path: ctx.path_string(),
    }
}

/// Provision the database and write every configuration artifact.
///
/// Success is the env file, schema initialization, service unit and readme.
/// Database provisioning and reverse-proxy files are reported but never
/// gate the result.
pub async fn configure_system<R, F, P>(
    ctx: &InstallContext<'_, R, F, P>,
    request: &ConfigureRequest,
) -> ConfigureOutcome
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    let config = ctx.config;
    let app = &config.app;
    let mut errors = Vec::new();

    let creds = match DatabaseCredentials::resolve(request, &config.database) {
        Ok(creds) => creds,
        Err(e) => {
            ctx.reporter.warn(&format!("cannot resolve database credentials: {e}"));
            tracing::info!(phase = %Phase::ConfigureSystem, succeeded = false, "phase finished");
            return ConfigureOutcome {
                succeeded: false,
                db_setup_result: DatabaseSetupResult::NotAttempted,
                env_file_written: false,
                schema_init: CommandResult::not_run("configuration aborted"),
                service_unit_written: false,
                readme_written: false,
                proxy_config_written: None,
                domain: None,
                admin_email: app.admin_email.clone(),
                admin_password: app.admin_password.clone(),
                errors: vec![format!("cannot resolve database credentials: {e}")],
            };
        }
    };

    let prober = ctx.prober();
    let domain = prober.detect_domain(ctx.install_path, ctx.entry_file);
    let install_dir = ctx.path_string();

    ctx.reporter.step("setting up database...");
    let db_setup_result =
        setup_database(ctx.runner, ctx.fs, &config.database, &config.platform, &creds).await;
    match &db_setup_result {
        DatabaseSetupResult::ManualSetupRequired { message } => ctx.reporter.warn(message),
        DatabaseSetupResult::Provisioned { .. } => ctx.reporter.success("database provisioned"),
        DatabaseSetupResult::NotAttempted => {}
    }

    ctx.reporter.step("writing environment file...");
    let env_file_written = match render_env_file(&creds, app) {
        Ok(content) => write_artifact(ctx, ENV_FILE, &content, true, &mut errors),
        Err(e) => {
            errors.push(format!("{ENV_FILE}: {e}"));
            false
        }
    };

    ctx.reporter.step("initializing database schema...");
    let schema_init = initialize_schema(ctx.runner, ctx.fs, &config.runtime, ctx.install_path).await;
    if schema_init.succeeded {
        ctx.reporter.success("database schema initialized");
    } else {
        ctx.reporter.warn("database schema initialization failed");
    }

    let unit = render_service_unit(&install_dir, domain.as_deref(), app, &config.runtime.env_dir);
    let service_unit_written = write_artifact(ctx, &service_unit_file(app), &unit, false, &mut errors);

    let readme = render_readme(domain.as_deref(), app);
    let readme_written = write_artifact(ctx, &app.readme_file, &readme, false, &mut errors);

    let proxy_config_written = if prober.is_under_web_root(ctx.install_path)
        || prober.is_platform_detected()
    {
        let gunicorn = render_gunicorn_config(app);
        let htaccess = render_htaccess(app.port);
        let gunicorn_ok = write_artifact(ctx, GUNICORN_CONFIG_FILE, &gunicorn, false, &mut errors);
        let htaccess_ok = write_artifact(ctx, HTACCESS_FILE, &htaccess, false, &mut errors);
        Some(gunicorn_ok && htaccess_ok)
    } else {
        None
    };

    if config.uses_default_admin_password() {
        ctx.reporter
            .warn("the default administrator password is in use; change it on first login");
    }

    let succeeded = env_file_written && schema_init.succeeded && service_unit_written && readme_written;
    tracing::info!(phase = %Phase::ConfigureSystem, succeeded, "phase finished");
    ConfigureOutcome {
        succeeded,
        db_setup_result,
        env_file_written,
        schema_init,
        service_unit_written,
        readme_written,
        proxy_config_written,
        domain,
        admin_email: app.admin_email.clone(),
        admin_password: app.admin_password.clone(),
        errors,
    }
}

fn write_artifact<R, F, P>(
    ctx: &InstallContext<'_, R, F, P>,
    name: &str,
    content: &str,
    private: bool,
    errors: &mut Vec<String>,
) -> bool
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    let path = ctx.install_path.join(name);
    let result = if private {
        ctx.fs.write_private(&path, content)
    } else {
        ctx.fs.write(&path, content)
    };
    match result {
        Ok(()) => {
            ctx.reporter.success(&format!("wrote {name}"));
            true
        }
        Err(e) => {
            ctx.reporter.warn(&format!("failed to write {name}"));
            errors.push(format!("{name}: {e:#}"));
            false
        }
    }
}

/// Point the operator at the application, optionally scheduling the
/// installer's removal first.
pub async fn finish_installation<R, F, P>(
    ctx: &InstallContext<'_, R, F, P>,
    request: FinishRequest,
) -> FinishOutcome
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    let site = ctx.site_url();
    let outcome = if request.remove_installer {
        let script = render_cleanup_script(&ctx.path_string(), ctx.entry_file);
        match ctx.fs.write(&ctx.cleanup_script(), &script) {
            Ok(()) => {
                ctx.reporter.success("installer removal scheduled");
                FinishOutcome {
                    succeeded: true,
                    message: "Installation complete. The installer will now remove itself."
                        .to_string(),
                    redirect_target: "cleanup".to_string(),
                }
            }
            Err(e) => {
                ctx.reporter.warn("could not schedule installer removal");
                FinishOutcome {
                    succeeded: false,
                    message: format!("could not write {CLEANUP_SCRIPT_FILE}: {e:#}"),
                    redirect_target: site,
                }
            }
        }
    } else {
        ctx.reporter.success("installation complete");
        FinishOutcome {
            succeeded: true,
            message: "Installation complete.".to_string(),
            redirect_target: site,
        }
    };
    tracing::info!(
        phase = %Phase::FinishInstallation,
        succeeded = outcome.succeeded,
        "phase finished"
    );
    outcome
}

/// Dispatch a wizard request to its phase.
pub async fn run_phase<R, F, P>(ctx: &InstallContext<'_, R, F, P>, request: &PhaseRequest) -> PhaseOutcome
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    match request {
        PhaseRequest::CheckEnvironment => PhaseOutcome::CheckEnvironment(check_environment(ctx).await),
        PhaseRequest::InstallFiles => PhaseOutcome::InstallFiles(install_files(ctx).await),
        PhaseRequest::ConfigureSystem(req) => {
            PhaseOutcome::ConfigureSystem(configure_system(ctx, req).await)
        }
        PhaseRequest::FinishInstallation(req) => {
            PhaseOutcome::FinishInstallation(finish_installation(ctx, *req).await)
        }
    }
}

/// Run the cleanup script written by `finish_installation`, if any.
pub async fn run_cleanup<R, F, P>(ctx: &InstallContext<'_, R, F, P>) -> Option<CommandResult>
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    let script = ctx.cleanup_script();
    if !ctx.fs.exists(&script) {
        return None;
    }
    let script = script.to_string_lossy();
    let result = ctx.runner.run("sh", &[&script]).await;
    if !result.succeeded {
        tracing::warn!(output = %result.output, "cleanup script failed");
    }
    Some(result)
}

/// Outcomes of a headless run plus the record written for it.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<PhaseOutcome>,
    pub record: InstallRecord,
    /// Whether the record reached the install path.
    pub record_written: bool,
}

impl RunReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.record.succeeded
    }
}

/// Run every phase in order, stopping at the first failure after the
/// environment check, then persist an [`InstallRecord`].
pub async fn run_all<R, F, P>(
    ctx: &InstallContext<'_, R, F, P>,
    configure: &ConfigureRequest,
    finish: FinishRequest,
) -> RunReport
where
    R: CommandRunner,
    F: LocalFs,
    P: ProgressReporter,
{
    let check = check_environment(ctx).await;
    let environment = check.snapshot.clone();
    let mut outcomes = vec![PhaseOutcome::CheckEnvironment(check)];

    let install = PhaseOutcome::InstallFiles(install_files(ctx).await);
    let mut proceed = install.succeeded();
    outcomes.push(install);

    if proceed {
        let configured = PhaseOutcome::ConfigureSystem(configure_system(ctx, configure).await);
        proceed = configured.succeeded();
        outcomes.push(configured);
    }
    if proceed {
        outcomes.push(PhaseOutcome::FinishInstallation(
            finish_installation(ctx, finish).await,
        ));
    }

    let phases: Vec<PhaseStatus> = outcomes
        .iter()
        .map(|o| PhaseStatus {
            phase: o.phase(),
            succeeded: o.succeeded(),
        })
        .collect();
    let succeeded = phases.len() == Phase::ALL.len() && phases.iter().all(|p| p.succeeded);
    let record = InstallRecord {
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment,
        phases,
        succeeded,
    };

    let record_written = match serde_json::to_string_pretty(&record) {
        Ok(json) => write_artifact(ctx, INSTALL_RECORD_FILE, &json, false, &mut Vec::new()),
        Err(e) => {
            tracing::warn!(error = %e, "cannot serialize install record");
            false
        }
    };

    RunReport {
        outcomes,
        record,
        record_written,
    }
}
