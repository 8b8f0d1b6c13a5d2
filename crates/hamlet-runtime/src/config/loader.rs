//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Config file (`hamlet.toml`, first found in the search paths, or an
//!    explicit path)
//! 3. Environment variables (`HAMLET_*`)
//! 4. Programmatic overrides
//!
//! # Environment Variable Mapping
//!
//! Environment variables are mapped using the `HAMLET_` prefix with `__` as
//! separator:
//!
//! - `HAMLET_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `HAMLET_LLM__MODEL=gpt-4o-mini` → `llm.model = "gpt-4o-mini"`
//! - `HAMLET_PLUGINS__DUPLICATES=reject` → `plugins.duplicates = "reject"`
//!
//! Secrets are never read from here; see [`Secrets`](super::Secrets).
//!
//! # Example
//!
//! ```rust,ignore
//! use hamlet_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .file("./config/hamlet.toml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::HamletConfig;
use super::validation::validate_config;

const FILE_NAME: &str = "hamlet.toml";
const ENV_PREFIX: &str = "HAMLET_";

/// Layers defaults, `hamlet.toml`, `HAMLET_*` variables and overrides.
pub struct ConfigLoader {
    overrides: Figment,
    search_paths: Vec<PathBuf>,
    read_env: bool,
    /// Explicit file; skips the search and must exist.
    explicit: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            search_paths: Vec::new(),
            read_env: true,
            explicit: None,
        }
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Adds the user config directory (`<config>/hamlet`) to search paths.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join("hamlet")),
            None => self,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.explicit = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: HamletConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Merges a single programmatic value at a dotted key.
    pub fn set<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<HamletConfig> {
        let figment = self.build_figment()?;
        let config: HamletConfig = figment.extract()?;
        validate_config(&config)?;

        debug!(
            logging_level = %config.logging.level,
            model = %config.llm.model,
            "Configuration loaded successfully"
        );
        Ok(config)
    }

    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(HamletConfig::default()));

        let file = match self.explicit {
            Some(path) if !path.exists() => return Err(ConfigError::MissingFile(path)),
            Some(path) => Some(path),
            None => locate(&self.search_paths),
        };
        match file {
            Some(path) => {
                info!(path = %path.display(), "Reading {FILE_NAME}");
                figment = figment.merge(Toml::file(path));
            }
            None => warn!("No {FILE_NAME} found, using built-in defaults"),
        }

        if self.read_env {
            trace!("Merging {ENV_PREFIX}* environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment.merge(self.overrides))
    }
}

/// First `hamlet.toml` in `paths`, or in the working directory and the user
/// config directory when no paths were given.
fn locate(paths: &[PathBuf]) -> Option<PathBuf> {
    let defaults;
    let paths = if paths.is_empty() {
        defaults = std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|d| d.join("hamlet")))
            .collect::<Vec<_>>();
        &defaults
    } else {
        paths
    };

    paths.iter().map(|dir| dir.join(FILE_NAME)).find(|candidate| {
        let found = candidate.exists();
        trace!(path = %candidate.display(), found, "Looking for configuration");
        found
    })
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<HamletConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from `path`, plus environment overrides.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<HamletConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use hamlet_framework::{DuplicatePolicy, FailureNotice};

    #[test]
    fn test_default_config() {
        figment::Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .unwrap();
            assert_eq!(config.logging.level, LogLevel::Info);
            assert_eq!(config.llm.model, "gpt-3.5-turbo");
            assert_eq!(config.responder.trigger_phrase, "To be or not to be");
            assert_eq!(config.platform.token_env, "DISCORD_TOKEN");
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                FILE_NAME,
                r#"
                [plugins]
                commands_dir = "commands"
                duplicates = "reject"

                [responder]
                failure_notice = "direct-only"

                [llm]
                model = "from-file"
                "#,
            )?;
            jail.set_env("HAMLET_LLM__MODEL", "from-env");
            jail.set_env("HAMLET_LOGGING__LEVEL", "debug");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .unwrap();
            assert_eq!(config.llm.model, "from-env");
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.plugins.duplicates, DuplicatePolicy::Reject);
            assert_eq!(config.plugins.commands_dir, Some(PathBuf::from("commands")));
            assert_eq!(config.responder.failure_notice, FailureNotice::DirectOnly);
            Ok(())
        });
    }

    #[test]
    fn test_overrides_win() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HAMLET_LLM__MODEL", "from-env");
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .set("llm.model", "from-code")
                .load()
                .unwrap();
            assert_eq!(config.llm.model, "from-code");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_missing_file() {
        let result = ConfigLoader::new()
            .file("/definitely/not/here/hamlet.toml")
            .without_env()
            .load();
        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(FILE_NAME, "[llm]\ntimeout_secs = 0\n")?;
            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
            Ok(())
        });
    }
}
