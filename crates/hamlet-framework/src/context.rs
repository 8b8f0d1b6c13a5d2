//! Shared application state handed to every handler.

use std::fmt;
use std::sync::{Arc, OnceLock};

use hamlet_core::{BotIdentity, BoxedCompletion};
use tracing::debug;

use crate::plugin::CommandTable;
use crate::responder::ResponderSettings;

/// Application-wide state.
///
/// Built once at startup, after the command table is loaded, and shared by
/// reference with every command and event handler.
pub struct AppContext {
    commands: Arc<CommandTable>,
    completion: BoxedCompletion,
    responder: ResponderSettings,
    identity: OnceLock<BotIdentity>,
}

impl AppContext {
    /// Creates the context.
    pub fn new(
        commands: impl Into<Arc<CommandTable>>,
        completion: BoxedCompletion,
        responder: ResponderSettings,
    ) -> Self {
        Self {
            commands: commands.into(),
            completion,
            responder,
            identity: OnceLock::new(),
        }
    }

    /// The loaded command table.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// The language-model client.
    pub fn completion(&self) -> &BoxedCompletion {
        &self.completion
    }

    /// Message-trigger settings.
    pub fn responder(&self) -> &ResponderSettings {
        &self.responder
    }

    /// The bot's own account, once the session is ready.
    pub fn identity(&self) -> Option<&BotIdentity> {
        self.identity.get()
    }

    /// Records the bot's account. Later calls keep the first identity.
    pub fn set_identity(&self, identity: BotIdentity) {
        if let Err(rejected) = self.identity.set(identity) {
            debug!(tag = %rejected.tag, "Identity already recorded, keeping the first one");
        }
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("commands", &self.commands.len())
            .field("responder", &self.responder)
            .field("identity", &self.identity.get())
            .finish_non_exhaustive()
    }
}
