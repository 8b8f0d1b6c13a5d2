//! Configuration module for the Hamlet runtime.
//!
//! This module provides layered TOML/environment configuration loading,
//! validation, and secret lookup.

pub mod error;
pub mod loader;
pub mod schema;
pub mod secrets;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config, load_config_from_file};
pub use schema::{
    HamletConfig, LlmConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, PlatformConfig,
    PluginsConfig,
};
pub use secrets::{Secrets, read_secret};
pub use validation::validate_config;
