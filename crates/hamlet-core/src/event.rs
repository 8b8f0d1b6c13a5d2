//! Gateway events delivered by the platform adapter.
//!
//! Every event has a stable trigger name that event handlers bind to. The
//! names follow the platform's own event vocabulary:
//!
//! | Variant | Trigger |
//! |---------|---------|
//! | [`GatewayEvent::Ready`] | `ready` |
//! | [`GatewayEvent::InteractionCreate`] | `interactionCreate` |
//! | [`GatewayEvent::MessageCreate`] | `messageCreate` |

use std::fmt;

use crate::interaction::BoxedInteraction;
use crate::message::BoxedMessage;

/// Trigger names for the built-in gateway events.
pub mod triggers {
    /// The session is established and the bot identity is known.
    pub const READY: &str = "ready";
    /// A slash command was invoked.
    pub const INTERACTION_CREATE: &str = "interactionCreate";
    /// A message was posted somewhere the bot can see.
    pub const MESSAGE_CREATE: &str = "messageCreate";
}

/// The bot's own account, as reported on `ready`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    /// Platform user id.
    pub id: u64,
    /// Display tag (e.g. `hamlet#0420`).
    pub tag: String,
}

/// An event received from the platform.
#[derive(Clone)]
pub enum GatewayEvent {
    /// The session is ready.
    Ready(BotIdentity),
    /// A slash command invocation.
    InteractionCreate(BoxedInteraction),
    /// An inbound chat message.
    MessageCreate(BoxedMessage),
}

impl GatewayEvent {
    /// Returns the trigger name handlers bind to.
    pub fn trigger(&self) -> &'static str {
        match self {
            Self::Ready(_) => triggers::READY,
            Self::InteractionCreate(_) => triggers::INTERACTION_CREATE,
            Self::MessageCreate(_) => triggers::MESSAGE_CREATE,
        }
    }
}

impl fmt::Debug for GatewayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(identity) => f.debug_tuple("Ready").field(identity).finish(),
            Self::InteractionCreate(interaction) => f
                .debug_struct("InteractionCreate")
                .field("command", &interaction.command_name())
                .finish(),
            Self::MessageCreate(message) => f
                .debug_struct("MessageCreate")
                .field("author", &message.author_id())
                .field("channel", &message.channel_kind())
                .finish(),
        }
    }
}
