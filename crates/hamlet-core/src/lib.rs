//! # Hamlet Core
//!
//! Collaborator interfaces for the Hamlet chat-bot gateway client.
//!
//! Hamlet treats the messaging platform and the language model as external
//! collaborators reached through narrow traits. This crate defines those
//! traits and the values that cross them:
//!
//! - **Events**: [`GatewayEvent`] and its trigger names
//! - **Interactions**: slash-command invocations ([`Interaction`], [`Reply`])
//! - **Messages**: inbound chat messages ([`IncomingMessage`], [`ChannelKind`])
//! - **Platform**: the adapter contract ([`Platform`], [`EventSink`])
//! - **Completion**: the language-model contract ([`Completion`])
//!
//! ```text
//! ┌─────────────┐  GatewayEvent  ┌──────────┐      ┌──────────────┐
//! │  Platform   │───────────────▶│ EventBus │─────▶│   Handlers   │
//! │  (Discord)  │◀───────────────│ (runtime)│      │ (plugins)    │
//! └─────────────┘ reply / send   └──────────┘      └──────┬───────┘
//!                                                         │ complete
//!                                                  ┌──────▼───────┐
//!                                                  │  Completion  │
//!                                                  └──────────────┘
//! ```

pub mod command;
pub mod completion;
pub mod error;
pub mod event;
pub mod interaction;
pub mod message;
pub mod platform;

pub use command::CommandData;
pub use completion::{BoxedCompletion, Completion};
pub use error::{
    ApiError, ApiResult, BoxError, CompletionError, CompletionResult, PlatformError,
    PlatformResult,
};
pub use event::{BotIdentity, GatewayEvent, triggers};
pub use interaction::{BoxedInteraction, Interaction, Reply};
pub use message::{BoxedMessage, ChannelKind, IncomingMessage};
pub use platform::{BoxedPlatform, EventSink, Platform};
