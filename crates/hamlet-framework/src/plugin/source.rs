//! Handlers compiled into the binary.
//!
//! The `#[command]` and `#[event]` attributes from `hamlet-macros` append a
//! registration to [`COMMANDS`] or [`EVENTS`] at link time. A
//! [`StaticSource`] reads those tables, plus any entries added with
//! [`StaticSource::with`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hamlet_core::CommandData;
use linkme::distributed_slice;

use crate::command::CommandUnit;
use crate::error::{DiscoveryError, LoadError};
use crate::event::EventUnit;
use crate::handler::{self, CommandFn, EventFn};
use crate::plugin::{Locator, PluginCandidate, PluginSource, Validate};

// ─── Link-time tables ─────────────────────────────────────────────────────────

/// A compiled-in command, emitted by `#[command]`.
pub struct CommandRegistration {
    /// `module::function` path of the handler.
    pub origin: &'static str,
    /// Command name.
    pub name: &'static str,
    /// Command description.
    pub description: &'static str,
    /// Handler.
    pub handler: CommandFn,
}

/// A compiled-in event handler, emitted by `#[event]`.
pub struct EventRegistration {
    /// `module::function` path of the handler.
    pub origin: &'static str,
    /// Trigger name.
    pub name: &'static str,
    /// Whether the handler fires only once.
    pub once: bool,
    /// Handler.
    pub handler: EventFn,
}

/// Every `#[command]` in the binary.
#[distributed_slice]
pub static COMMANDS: [CommandRegistration];

/// Every `#[event]` in the binary.
#[distributed_slice]
pub static EVENTS: [EventRegistration];

impl CommandRegistration {
    fn unit(&self) -> CommandUnit {
        let f = self.handler;
        CommandUnit {
            data: Some(CommandData::new(self.name, self.description)),
            execute: Some(handler::command_service(move |ctx| f(ctx))),
            ..CommandUnit::default()
        }
    }
}

impl EventRegistration {
    fn unit(&self) -> EventUnit {
        let f = self.handler;
        EventUnit {
            name: Some(self.name.to_owned()),
            once: self.once,
            execute: Some(handler::event_service(move |args| f(args))),
            ..EventUnit::default()
        }
    }
}

// ─── StaticSource ─────────────────────────────────────────────────────────────

type Factory<U> = Arc<dyn Fn() -> Result<U, String> + Send + Sync>;

/// An in-memory plugin source.
pub struct StaticSource<U> {
    label: String,
    entries: Vec<(String, Factory<U>)>,
}

impl<U> StaticSource<U> {
    /// Creates an empty source described as `label` in logs.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry that always builds.
    pub fn with<F>(self, origin: impl Into<String>, build: F) -> Self
    where
        F: Fn() -> U + Send + Sync + 'static,
    {
        self.try_with(origin, move || Ok(build()))
    }

    /// Appends an entry whose factory may fail.
    pub fn try_with<F>(mut self, origin: impl Into<String>, build: F) -> Self
    where
        F: Fn() -> Result<U, String> + Send + Sync + 'static,
    {
        self.entries.push((origin.into(), Arc::new(build)));
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the source holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StaticSource<CommandUnit> {
    /// Reads every `#[command]` linked into the binary.
    pub fn commands() -> Self {
        COMMANDS.static_slice().iter().fold(Self::new("compiled-in commands"), |source, reg| {
            source.with(reg.origin, move || reg.unit())
        })
    }
}

impl StaticSource<EventUnit> {
    /// Reads every `#[event]` linked into the binary.
    pub fn events() -> Self {
        EVENTS.static_slice().iter().fold(Self::new("compiled-in events"), |source, reg| {
            source.with(reg.origin, move || reg.unit())
        })
    }
}

impl<U> fmt::Debug for StaticSource<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSource")
            .field("label", &self.label)
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[async_trait]
impl<U> PluginSource for StaticSource<U>
where
    U: Validate + Send + 'static,
{
    type Unit = U;

    fn location(&self) -> String {
        self.label.clone()
    }

    async fn discover(&self) -> Result<Vec<PluginCandidate>, DiscoveryError> {
        Ok(self
            .entries
            .iter()
            .enumerate()
            .map(|(index, (origin, _))| PluginCandidate {
                origin: origin.clone(),
                locator: Locator::Index(index),
            })
            .collect())
    }

    async fn materialize(&self, candidate: &PluginCandidate) -> Result<U, LoadError> {
        let Locator::Index(index) = candidate.locator else {
            return Err(LoadError::Unknown(candidate.origin.clone()));
        };
        let (_, build) = self
            .entries
            .get(index)
            .ok_or_else(|| LoadError::Unknown(candidate.origin.clone()))?;
        build().map_err(|reason| LoadError::Factory {
            candidate: candidate.origin.clone(),
            reason,
        })
    }
}
