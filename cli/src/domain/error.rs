//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while validating an [`InstallerConfig`](super::config::InstallerConfig).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid minimum runtime version '{0}': expected MAJOR.MINOR[.PATCH]")]
    InvalidMinVersion(String),

    #[error("The dependency manifest is empty; runtime.packages needs at least one package")]
    EmptyManifest,

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ── Secret errors ─────────────────────────────────────────────────────────────

/// Errors raised by the secret generator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Secret length must be at least 1")]
    EmptyLength,

    #[error("System random source is unavailable")]
    RandomUnavailable,
}
