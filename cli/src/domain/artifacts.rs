//! Templates for every file the installer writes.
//!
//! Rendering is deterministic given its inputs; the only exception is the
//! session secret drawn inside [`render_env_file`].

use crate::domain::config::AppConfig;
use crate::domain::credentials::DatabaseCredentials;
use crate::domain::error::SecretError;
use crate::domain::secret::{self, SESSION_SECRET_LENGTH};

pub const ENV_FILE: &str = ".env";
pub const GUNICORN_CONFIG_FILE: &str = "gunicorn_conf.py";
pub const HTACCESS_FILE: &str = ".htaccess";
pub const CLEANUP_SCRIPT_FILE: &str = "remove-installer.sh";
pub const INSTALL_RECORD_FILE: &str = "install-record.json";
pub const SCHEMA_SCRIPT_PREFIX: &str = "init_db_script";

/// Name of the generated systemd unit file.
#[must_use]
pub fn service_unit_file(app: &AppConfig) -> String {
    format!("{}.service", app.service_name)
}

/// Environment file consumed by the application at start-up.
///
/// # Errors
///
/// Returns an error if the session secret cannot be generated.
pub fn render_env_file(creds: &DatabaseCredentials, app: &AppConfig) -> Result<String, SecretError> {
    let session_secret = secret::generate(SESSION_SECRET_LENGTH)?;
    Ok(format!(
        "DATABASE_URL={}\nSESSION_SECRET={session_secret}\nFLASK_APP={}\nFLASK_ENV=production\n",
        creds.connection_url(),
        flask_app_file(&app.entry_point),
    ))
}

/// `main:app` → `main.py`
fn flask_app_file(entry_point: &str) -> String {
    let module = entry_point.split(':').next().unwrap_or(entry_point);
    format!("{}.py", module.replace('.', "/"))
}

/// systemd unit running the application under gunicorn.
#[must_use]
pub fn render_service_unit(install_path: &str, domain: Option<&str>, app: &AppConfig, env_dir: &str) -> String {
    let description = match domain {
        Some(domain) => format!("{} ({domain})", app.name),
        None => app.name.clone(),
    };
    format!(
        "[Unit]\n\
         Description={description}\n\
         After=network.target postgresql.service\n\
         \n\
         [Service]\n\
         User={user}\n\
         WorkingDirectory={install_path}\n\
         EnvironmentFile={install_path}/{ENV_FILE}\n\
         ExecStart={install_path}/{env_dir}/bin/gunicorn --bind 0.0.0.0:{port} --workers {workers} --timeout {timeout} {entry}\n\
         Restart=always\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n",
        user = app.service_user,
        port = app.port,
        workers = app.workers,
        timeout = app.worker_timeout_secs,
        entry = app.entry_point,
    )
}

/// Post-install instructions written next to the application.
#[must_use]
pub fn render_readme(domain: Option<&str>, app: &AppConfig) -> String {
    let base_url = match domain {
        Some(domain) => format!("https://{domain}"),
        None => format!("http://<server-address>:{}", app.port),
    };
    let unit = service_unit_file(app);
    format!(
        "# {name} - Installation Complete\n\
         \n\
         ## Accessing the System\n\
         \n\
         1. Open {base_url}\n\
         2. To load the initial data set, open {base_url}/init_db\n\
         \n\
         ## Running as a Service\n\
         \n\
         ```\n\
         cp {unit} /etc/systemd/system/\n\
         systemctl enable {unit}\n\
         systemctl start {unit}\n\
         ```\n\
         \n\
         ## Default Credentials\n\
         \n\
         After the initial data is loaded you can sign in with:\n\
         - Email: {email}\n\
         - Password: {password}\n\
         \n\
         **Important:** change this password on first login.\n\
         \n\
         ## Support\n\
         \n\
         - Email: {support_email}\n\
         - Phone: {support_phone}\n",
        name = app.name,
        email = app.admin_email,
        password = app.admin_password,
        support_email = app.support_email,
        support_phone = app.support_phone,
    )
}

/// Bootstrap program that creates the application's tables.
#[must_use]
pub fn render_schema_bootstrap() -> &'static str {
    "from app import app\n\
     from main import db\n\
     app.app_context().push()\n\
     db.create_all()\n\
     print(\"Database schema initialized\")\n"
}

/// gunicorn settings used behind the panel's reverse proxy.
#[must_use]
pub fn render_gunicorn_config(app: &AppConfig) -> String {
    format!(
        "import multiprocessing\n\
         \n\
         bind = \"0.0.0.0:{port}\"\n\
         workers = multiprocessing.cpu_count() * 2 + 1\n\
         max_requests = 1000\n\
         max_requests_jitter = 50\n\
         timeout = {timeout}\n",
        port = app.port,
        timeout = app.worker_timeout_secs,
    )
}

/// Rewrite rules proxying the document root to the application port.
#[must_use]
pub fn render_htaccess(port: u16) -> String {
    format!(
        "<IfModule mod_rewrite.c>\n    \
         RewriteEngine On\n    \
         RewriteRule ^(.*)$ http://localhost:{port}/$1 [P,L]\n\
         </IfModule>\n"
    )
}

/// Shell script deleting the installer entry point and then itself.
#[must_use]
pub fn render_cleanup_script(install_path: &str, entry_file: &str) -> String {
    let target = shell_quote(&format!("{install_path}/{entry_file}"));
    format!("#!/bin/sh\nrm -f -- {target}\nrm -f -- \"$0\"\n")
}

/// Single-quote `value` for POSIX sh.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

// ── Unit tests ────────────────────────────────────────────────────────────────
