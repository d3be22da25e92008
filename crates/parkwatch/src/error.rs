//! CLI error type and exit codes.

use thiserror::Error;

use parkwatch_config::ConfigError;
use parkwatch_core::SyncError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Sync(#[from] SyncError),

    #[error("failed to build feed client: {0}")]
    Client(#[from] parkwatch_api::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code: 2 for configuration problems, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}
