//! Slash-command metadata shared between the registry and the platform.

use serde::{Deserialize, Serialize};

/// Declarative description of a slash command.
///
/// `name` is the lookup key in the command table; `description` is what the
/// platform shows in its command picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandData {
    /// Command name, matched exactly and case-sensitively.
    pub name: String,
    /// Short human-readable description.
    #[serde(default)]
    pub description: String,
}

impl CommandData {
    /// Creates command metadata.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
