//! # Hamlet
//!
//! A chat-bot gateway client: slash commands and event handlers are loaded as
//! plugins, a fixed phrase gets a canned reply, and direct messages or
//! mentions are answered by a language model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  GatewayEvent  ┌──────────┐  trigger   ┌──────────────────────────┐
//! │ Platform │───────────────▶│ Runtime  │───────────▶│ EventBus                 │
//! │ (Discord)│                │          │            │  ready             ─▶ identity
//! └──────────┘                └──────────┘            │  interactionCreate ─▶ CommandTable
//!       ▲                                             │  messageCreate     ─▶ responder ─▶ LLM
//!       └──────────── replies ────────────────────────┴──────────────────────────┘
//! ```
//!
//! - **Runtime**: loads plugins, runs the event loop, shuts down on signal
//! - **Registry**: command plugins by name, last write wins
//! - **Dispatcher**: event plugins by trigger name, once or repeating
//! - **Collaborators**: the platform adapter and the completion client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hamlet::prelude::*;
//!
//! #[command(description = "Replies with Pong!")]
//! async fn ping(ctx: CommandContext) -> HandlerResult {
//!     ctx.reply("Pong!").await?;
//!     Ok(())
//! }
//! ```
//!
//! The attribute macros expand to paths under `hamlet_framework`, so a crate
//! using them also depends on `hamlet-framework` directly.
//!
//! ## Features
//!
//! - `discord` (default): Discord gateway adapter
//! - `openai` (default): OpenAI-compatible completion client
//! - `json-log`: JSON log lines

pub use hamlet_core as core;
pub use hamlet_framework as framework;
pub use hamlet_macros as macros;
pub use hamlet_runtime as runtime;

#[cfg(feature = "discord")]
pub use hamlet_adapter_discord as discord;
#[cfg(feature = "openai")]
pub use hamlet_openai as openai;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use hamlet::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use hamlet_runtime::{HamletConfig, HamletRuntime, Secrets, load_config_from_file};

    // Plugin declaration
    pub use hamlet_macros::{command, event};

    // Handler signatures
    pub use hamlet_framework::{CommandContext, EventArgs, HandlerResult};

    // Collaborator interfaces
    pub use hamlet_core::{GatewayEvent, Interaction, Reply};

    #[cfg(feature = "discord")]
    pub use hamlet_adapter_discord::{DiscordAdapter, DiscordOptions};
    #[cfg(feature = "openai")]
    pub use hamlet_openai::{OpenAiClient, OpenAiSettings};
}
