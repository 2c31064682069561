//! Application services: use-case orchestration.
//!
//! Each provisioner module composes domain logic with port trait calls;
//! `phases` strings them together into the wizard's four phases. Services
//! import only from `crate::domain` and `crate::application::ports`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

pub mod database;
pub mod dependencies;
pub mod environment;
pub mod phases;
pub mod schema;
