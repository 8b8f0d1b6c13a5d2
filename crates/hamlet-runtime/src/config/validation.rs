//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{HamletConfig, LlmConfig, LogOutput, PluginsConfig};
use hamlet_framework::ResponderSettings;

/// Validates the entire configuration.
pub fn validate_config(config: &HamletConfig) -> ConfigResult<()> {
    if config.logging.output == LogOutput::File && config.logging.file_path.is_none() {
        return Err(ConfigError::invalid(
            "logging.output is \"file\" but logging.file_path is not set",
        ));
    }
    validate_plugins(&config.plugins)?;
    validate_responder(&config.responder)?;
    validate_llm(&config.llm)?;

    if config.platform.token_env.trim().is_empty() {
        return Err(ConfigError::invalid("platform.token_env must not be empty"));
    }
    if config.platform.event_queue == 0 {
        return Err(ConfigError::invalid(
            "platform.event_queue must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_plugins(plugins: &PluginsConfig) -> ConfigResult<()> {
    if plugins.extension.trim_start_matches('.').is_empty() {
        return Err(ConfigError::invalid("plugins.extension must not be empty"));
    }
    if plugins.handler_timeout_secs == Some(0) {
        return Err(ConfigError::invalid(
            "plugins.handler_timeout_secs must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_responder(responder: &ResponderSettings) -> ConfigResult<()> {
    if responder.trigger_phrase.is_empty() {
        return Err(ConfigError::invalid(
            "responder.trigger_phrase must not be empty",
        ));
    }
    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> ConfigResult<()> {
    if llm.model.trim().is_empty() {
        return Err(ConfigError::invalid("llm.model must not be empty"));
    }
    if llm.timeout_secs == 0 {
        return Err(ConfigError::invalid(
            "llm.timeout_secs must be greater than 0",
        ));
    }
    if !["http://", "https://"]
        .iter()
        .any(|scheme| llm.base_url.starts_with(scheme))
    {
        return Err(ConfigError::invalid(format!(
            "llm.base_url must start with http:// or https://, got {:?}",
            llm.base_url
        )));
    }
    if llm.api_key_env.trim().is_empty() {
        return Err(ConfigError::invalid("llm.api_key_env must not be empty"));
    }
    Ok(())
}
