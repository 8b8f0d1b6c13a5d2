//! # Hamlet Framework
//!
//! Plugin loading and event dispatch for the Hamlet gateway client.
//!
//! This layer provides:
//! - [`PluginRegistry`]: loads command plugins into a [`CommandTable`]
//! - [`EventDispatcher`] / [`EventBus`]: binds event plugins to trigger names
//!   and fans events out to them
//! - The slash-command invocation path ([`handle_interaction`])
//! - The message-trigger path ([`handle_message`])
//! - Plugin sources: compiled-in handlers ([`StaticSource`]) and TOML
//!   manifests ([`ManifestDir`])
//!
//! Handlers are type-erased tower services, so any tower layer can wrap them.

pub mod builtin;
pub mod bus;
pub mod command;
pub mod context;
pub mod error;
pub mod event;
pub mod handler;
pub mod plugin;
pub mod responder;

pub use builtin::builtin_events;
pub use bus::{DispatchReport, EventBinding, EventBus, EventDispatcher};
pub use command::{
    CommandContext, CommandDescriptor, CommandOutcome, CommandUnit, handle_interaction,
};
pub use context::AppContext;
pub use error::{DiscoveryError, LoadError, NotFound, ValidationError};
pub use event::{BindingMode, EventArgs, EventDescriptor, EventUnit};
pub use handler::{
    CommandService, EventService, HandlerResult, command_service, event_service, with_timeout,
};
pub use plugin::{
    CommandManifest, CommandTable, DuplicatePolicy, EventManifest, LoadReport, ManifestDir,
    PluginCandidate, PluginRegistry, PluginSource, StaticSource,
};
pub use responder::{
    FailureNotice, MessageOutcome, ResponderSettings, SOLILOQUY, handle_message, strip_mention,
};

/// Re-exports used by code generated with `hamlet-macros`.
#[doc(hidden)]
pub mod __private {
    pub use futures;
    pub use linkme;
}
