//! Path heuristics and version parsing for environment detection.
//!
//! This module is intentionally free of I/O. The prober in
//! `application::services::environment` feeds it command output and paths.

use std::sync::LazyLock;

use regex::Regex;

/// `Python 3.11.4` → `3.11.4`.
static RUNTIME_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"Python (\d+\.\d+\.\d+)").expect("valid regex")
});

/// `psql (PostgreSQL) 16.2` → `16.2`.
static DB_CLIENT_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(\d+\.\d+)").expect("valid regex")
});

/// Extract the runtime version from `python3 --version` output.
#[must_use]
pub fn extract_runtime_version(output: &str) -> Option<String> {
    RUNTIME_VERSION_RE
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the client version from `psql --version` output.
#[must_use]
pub fn extract_db_client_version(output: &str) -> Option<String> {
    DB_CLIENT_VERSION_RE
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Guess the site's hostname from the installer's absolute path.
///
/// Hosting panels lay sites out as `/home/<domain>/public_html/...`, so the
/// first segment containing a dot (other than the entry file itself) is
/// taken as the domain. Best-effort: `None` when no segment qualifies.
#[must_use]
pub fn detect_domain(entry_path: &str, entry_file: &str) -> Option<String> {
    entry_path
        .split(['/', '\\'])
        .find(|segment| segment.contains('.') && *segment != entry_file && !is_dot_dir(segment))
        .map(str::to_string)
}

fn is_dot_dir(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Whether the install path sits inside a web-served document root.
#[must_use]
pub fn is_under_web_root(install_path: &str, web_root_dir: &str) -> bool {
    install_path.contains(web_root_dir)
}

// ── Unit tests ────────────────────────────────────────────────────────────────
