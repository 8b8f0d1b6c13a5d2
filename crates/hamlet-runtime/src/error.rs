//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The platform session could not be started.
    #[error("Platform error: {0}")]
    Platform(#[from] hamlet_core::PlatformError),

    /// A required collaborator was not supplied to the builder.
    #[error("Runtime is missing a {0}")]
    MissingComponent(&'static str),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
