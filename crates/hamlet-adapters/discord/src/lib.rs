//! # Hamlet Adapter for Discord
//!
//! Connects the Hamlet runtime to the Discord gateway through `serenity`.
//!
//! ## Overview
//!
//! The adapter logs in with a bot token, subscribes to guild and direct
//! messages, and turns three gateway events into [`GatewayEvent`]s:
//!
//! | Discord event | Hamlet event |
//! |---------------|--------------|
//! | `READY` | [`GatewayEvent::Ready`] |
//! | `INTERACTION_CREATE` (slash commands) | [`GatewayEvent::InteractionCreate`] |
//! | `MESSAGE_CREATE` | [`GatewayEvent::MessageCreate`] |
//!
//! On ready it can also publish the loaded slash commands globally.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hamlet_adapter_discord::{DiscordAdapter, DiscordOptions};
//!
//! let adapter = DiscordAdapter::new(token, DiscordOptions::default());
//! let runtime = HamletRuntime::builder()
//!     .platform(Arc::new(adapter))
//!     // ...
//!     .build()?;
//! ```
//!
//! [`GatewayEvent`]: hamlet_core::GatewayEvent
//! [`GatewayEvent::Ready`]: hamlet_core::GatewayEvent::Ready
//! [`GatewayEvent::InteractionCreate`]: hamlet_core::GatewayEvent::InteractionCreate
//! [`GatewayEvent::MessageCreate`]: hamlet_core::GatewayEvent::MessageCreate

mod adapter;
mod config;
mod handler;
mod interaction;
mod message;

pub use adapter::DiscordAdapter;
pub use config::DiscordOptions;
pub use interaction::DiscordInteraction;
pub use message::DiscordMessage;
