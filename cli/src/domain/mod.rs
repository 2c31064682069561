//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifacts;
pub mod config;
pub mod credentials;
pub mod environment;
pub mod error;
pub mod requirements;
pub mod secret;

pub use config::InstallerConfig;
pub use credentials::DatabaseCredentials;
pub use error::{ConfigError, SecretError};
pub use requirements::{HostFacts, RequirementCatalog, validate};
