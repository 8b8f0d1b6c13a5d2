//! Slash commands: plugin shape and the invocation path.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hamlet_core::{ApiResult, BoxedInteraction, CommandData, Reply};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::context::AppContext;
use crate::error::ValidationError;
use crate::handler::{self, CommandService, HandlerResult};
use crate::plugin::{PluginCandidate, Validate, require_handler, require_name};

// ─── Handler input ────────────────────────────────────────────────────────────

/// What a command handler receives.
#[derive(Clone)]
pub struct CommandContext {
    /// Shared application state.
    pub app: Arc<AppContext>,
    /// The invocation being handled.
    pub interaction: BoxedInteraction,
}

impl CommandContext {
    /// Creates a handler input.
    pub fn new(app: Arc<AppContext>, interaction: BoxedInteraction) -> Self {
        Self { app, interaction }
    }

    /// Replies publicly with `content`.
    pub async fn reply(&self, content: impl Into<String>) -> ApiResult<()> {
        self.interaction.reply(Reply::public(content)).await
    }

    /// Replies with `content`, visible only to the invoker.
    pub async fn reply_private(&self, content: impl Into<String>) -> ApiResult<()> {
        self.interaction.reply(Reply::private(content)).await
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("command", &self.interaction.command_name())
            .finish_non_exhaustive()
    }
}

// ─── Plugin shape ─────────────────────────────────────────────────────────────

/// A command as loaded from a source, before validation.
#[derive(Default)]
pub struct CommandUnit {
    /// Declared metadata.
    pub data: Option<CommandData>,
    /// Declared handler.
    pub execute: Option<CommandService>,
    /// Free-form plugin metadata.
    pub metadata: Map<String, Value>,
}

/// A validated, invocable command.
#[derive(Clone)]
pub struct CommandDescriptor {
    data: CommandData,
    handler: CommandService,
    origin: String,
    metadata: Map<String, Value>,
}

impl CommandDescriptor {
    /// Command name; the lookup key.
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Declared metadata.
    pub fn data(&self) -> &CommandData {
        &self.data
    }

    /// Where the command was loaded from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Free-form plugin metadata.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Bounds every invocation by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handler = handler::with_timeout(self.handler, timeout);
        self
    }

    /// Runs the handler.
    pub async fn execute(&self, ctx: CommandContext) -> HandlerResult {
        handler::call(&self.handler, ctx).await
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("data", &self.data)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl Validate for CommandUnit {
    type Descriptor = CommandDescriptor;

    fn validate(self, candidate: &PluginCandidate) -> Result<CommandDescriptor, ValidationError> {
        let (name, description) = match self.data {
            Some(data) => (Some(data.name), data.description),
            None => (None, String::new()),
        };
        let name = require_name(name, candidate)?;
        let handler = require_handler(self.execute, candidate)?;
        Ok(CommandDescriptor {
            data: CommandData { name, description },
            handler,
            origin: candidate.origin.clone(),
            metadata: self.metadata,
        })
    }
}

// ─── Invocation ───────────────────────────────────────────────────────────────

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// No command has the invoked name; nothing was sent.
    NotFound,
    /// The handler completed.
    Completed,
    /// The handler failed and the invoker was told.
    Failed,
}

/// Runs the command named by `interaction`.
///
/// On handler failure the invoker gets the configured error message, visible
/// only to them. The message is a follow-up when the handler already replied
/// or deferred, and a first reply otherwise.
pub async fn handle_interaction(
    app: &Arc<AppContext>,
    interaction: BoxedInteraction,
) -> CommandOutcome {
    let name = interaction.command_name().to_owned();

    let command = match app.commands().lookup(&name) {
        Ok(command) => command,
        Err(e) => {
            error!("{e}");
            return CommandOutcome::NotFound;
        }
    };

    debug!(command = %name, user = %interaction.user_tag(), "Invoking command");
    let ctx = CommandContext::new(Arc::clone(app), Arc::clone(&interaction));
    let Err(e) = command.execute(ctx).await else {
        return CommandOutcome::Completed;
    };

    error!(command = %name, origin = %command.origin(), error = %e, "Command handler failed");

    let notice = Reply::private(app.responder().command_error_message.clone());
    let sent = if interaction.replied() || interaction.deferred() {
        interaction.follow_up(notice).await
    } else {
        interaction.reply(notice).await
    };
    match sent {
        Ok(()) => info!(command = %name, "Reported command failure to invoker"),
        Err(e) => error!(command = %name, error = %e, "Failed to report command failure"),
    }
    CommandOutcome::Failed
}
