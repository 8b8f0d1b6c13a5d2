//! Credentials read from the environment.

use std::fmt;

use super::error::{ConfigError, ConfigResult};
use super::schema::HamletConfig;

/// Reads a required secret from environment variable `var`.
pub fn read_secret(var: &str) -> ConfigResult<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSecret {
            var: var.to_string(),
        }),
    }
}

/// The two credentials the bot needs to start.
#[derive(Clone)]
pub struct Secrets {
    /// Messaging-platform bot token.
    pub platform_token: String,
    /// Language-model API key.
    pub llm_api_key: String,
}

impl Secrets {
    /// Reads both secrets from the variables the config names.
    pub fn from_env(config: &HamletConfig) -> ConfigResult<Self> {
        Ok(Self {
            platform_token: read_secret(&config.platform.token_env)?,
            llm_api_key: read_secret(&config.llm.api_key_env)?,
        })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("platform_token", &"<redacted>")
            .field("llm_api_key", &"<redacted>")
            .finish()
    }
}
