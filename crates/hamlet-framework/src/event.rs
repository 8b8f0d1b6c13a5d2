//! Event handlers: plugin shape and handler input.

use std::fmt;
use std::sync::Arc;

use hamlet_core::GatewayEvent;
use serde_json::{Map, Value};

use crate::context::AppContext;
use crate::error::ValidationError;
use crate::handler::EventService;
use crate::plugin::{PluginCandidate, Validate, require_handler, require_name};

/// What an event handler receives.
#[derive(Clone)]
pub struct EventArgs {
    /// Shared application state.
    pub app: Arc<AppContext>,
    /// The event being dispatched.
    pub event: GatewayEvent,
}

impl EventArgs {
    /// Creates a handler input.
    pub fn new(app: Arc<AppContext>, event: GatewayEvent) -> Self {
        Self { app, event }
    }
}

impl fmt::Debug for EventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventArgs")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// How often a binding fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BindingMode {
    /// At most once; removed before its first invocation.
    Once,
    /// On every matching event.
    #[default]
    Repeating,
}

impl BindingMode {
    /// `Once` when `once` is set, `Repeating` otherwise.
    pub fn from_flag(once: bool) -> Self {
        if once { Self::Once } else { Self::Repeating }
    }
}

/// An event handler as loaded from a source, before validation.
#[derive(Default)]
pub struct EventUnit {
    /// Trigger name.
    pub name: Option<String>,
    /// Whether the handler fires only once.
    pub once: bool,
    /// Declared handler.
    pub execute: Option<EventService>,
    /// Free-form plugin metadata.
    pub metadata: Map<String, Value>,
}

/// A validated event handler, ready to bind.
#[derive(Clone)]
pub struct EventDescriptor {
    /// Trigger name.
    pub trigger: String,
    /// Binding mode.
    pub mode: BindingMode,
    /// Handler.
    pub handler: EventService,
    /// Where the handler was loaded from.
    pub origin: String,
    /// Free-form plugin metadata.
    pub metadata: Map<String, Value>,
}

impl fmt::Debug for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDescriptor")
            .field("trigger", &self.trigger)
            .field("mode", &self.mode)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl Validate for EventUnit {
    type Descriptor = EventDescriptor;

    fn validate(self, candidate: &PluginCandidate) -> Result<EventDescriptor, ValidationError> {
        let trigger = require_name(self.name, candidate)?;
        let handler = require_handler(self.execute, candidate)?;
        Ok(EventDescriptor {
            trigger,
            mode: BindingMode::from_flag(self.once),
            handler,
            origin: candidate.origin.clone(),
            metadata: self.metadata,
        })
    }
}
