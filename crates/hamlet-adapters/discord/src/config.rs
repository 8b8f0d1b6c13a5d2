//! Adapter options.
//!
//! ```toml
//! [platform]
//! register_commands = true
//! ```

use serde::{Deserialize, Serialize};

/// Discord adapter options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordOptions {
    /// Publish the loaded commands as global application commands on ready.
    pub register_commands: bool,
}

impl Default for DiscordOptions {
    fn default() -> Self {
        Self {
            register_commands: true,
        }
    }
}
