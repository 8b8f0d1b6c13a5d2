//! Hamlet Runtime - Orchestration layer for the Hamlet gateway client.
//!
//! This crate provides:
//! - Runtime orchestration ([`HamletRuntime`]): plugin loading, the event
//!   loop and graceful shutdown
//! - Layered configuration ([`ConfigLoader`]) and secret lookup ([`Secrets`])
//! - Logging configuration ([`LoggingBuilder`])
//!
//! ```ignore
//! use hamlet_runtime::{HamletRuntime, Secrets, load_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let secrets = Secrets::from_env(&config)?;
//!
//!     let runtime = HamletRuntime::builder()
//!         .config(config)
//!         .platform(platform_from(&secrets))
//!         .completion(completion_from(&secrets))
//!         .build()?;
//!
//!     // Run until Ctrl+C
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, HamletConfig, LlmConfig, LogFormat, LogLevel,
    LogOutput, LoggingConfig, PlatformConfig, PluginsConfig, Secrets, load_config,
    load_config_from_file,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use runtime::{HamletRuntime, RuntimeBuilder, StopReason};

// Re-export tracing for use by other crates
pub use tracing;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `instrument` attribute
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, trace, warn};
}
