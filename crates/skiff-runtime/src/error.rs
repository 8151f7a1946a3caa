//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while assembling or running a bot.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// No action client was configured on the builder.
    #[error("no action client configured; provide the transport collaborator's client")]
    MissingActionClient,

    /// An advertised command was invalid or duplicated.
    #[error(transparent)]
    Command(#[from] skiff_framework::CommandError),

    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
