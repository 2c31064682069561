pub mod config;
pub mod outcome;
pub mod phase;
pub mod types;

pub use config::ServerConfig;
pub use outcome::{
    CheckEnvironmentOutcome, ConfigureOutcome, DatabaseSetupResult, FinishOutcome,
    InstallFilesOutcome, InstallRecord, PhaseOutcome,
};
pub use phase::{ConfigureRequest, FinishRequest, Phase, PhaseRequest};
pub use types::*;
