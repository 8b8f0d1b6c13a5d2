//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// Why a [`HamletConfig`](super::HamletConfig) or a secret could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested `hamlet.toml` does not exist.
    #[error("config file {0} does not exist")]
    MissingFile(PathBuf),

    /// Merging defaults, TOML and `HAMLET_*` variables failed.
    #[error("cannot read configuration: {0}")]
    Extract(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Startup-fatal: the token or API key variable is unset or blank.
    #[error("environment variable {var} is not set or empty")]
    MissingSecret { var: String },
}

impl ConfigError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
