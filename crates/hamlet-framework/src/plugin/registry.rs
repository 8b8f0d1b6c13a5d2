//! The command registry.

use std::collections::HashMap;
use std::time::Duration;

use hamlet_core::CommandData;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::command::{CommandDescriptor, CommandUnit};
use crate::error::{NotFound, ValidationError};
use crate::plugin::{self, PluginSource};

/// What happens when two commands declare the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The later command replaces the earlier one. A warning names both.
    #[default]
    Override,
    /// The later command is skipped as invalid.
    Reject,
}

/// Counts from loading one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Candidates the source listed.
    pub discovered: usize,
    /// Candidates that became plugins.
    pub loaded: usize,
    /// Candidates that failed to load or validate.
    pub skipped: usize,
}

// ─── CommandTable ─────────────────────────────────────────────────────────────

/// Name-to-command mapping.
///
/// Built by a [`PluginRegistry`] and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: HashMap<String, CommandDescriptor>,
}

impl CommandTable {
    /// Finds a command by exact, case-sensitive name.
    pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor, NotFound> {
        self.commands.get(name).ok_or_else(|| NotFound {
            name: name.to_owned(),
        })
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// `true` when no commands are loaded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Metadata for every command, sorted by name, for publishing to the
    /// platform.
    pub fn specs(&self) -> Vec<CommandData> {
        self.names()
            .into_iter()
            .filter_map(|name| self.commands.get(name))
            .map(|command| command.data().clone())
            .collect()
    }

    /// Iterates over commands in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values()
    }
}

// ─── PluginRegistry ───────────────────────────────────────────────────────────

/// Loads command plugins from one or more sources into a [`CommandTable`].
///
/// Sources are read in the order [`load`](Self::load) is called. With
/// [`DuplicatePolicy::Override`], the last command to declare a name wins.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    policy: DuplicatePolicy,
    timeout: Option<Duration>,
    table: CommandTable,
}

impl PluginRegistry {
    /// Creates an empty registry with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate-name policy.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bounds every command handler by `timeout`.
    pub fn handler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads every valid command from `source`.
    pub async fn load<S>(&mut self, source: &S) -> LoadReport
    where
        S: PluginSource<Unit = CommandUnit> + ?Sized,
    {
        let (loaded, mut report) = plugin::collect(source).await;

        for (candidate, descriptor) in loaded {
            let name = descriptor.name().to_owned();
            if let Some(existing) = self.table.commands.get(&name) {
                match self.policy {
                    DuplicatePolicy::Override => warn!(
                        command = %name,
                        replaced = %existing.origin(),
                        by = %candidate.origin,
                        "Duplicate command name, the later definition wins"
                    ),
                    DuplicatePolicy::Reject => {
                        let e = ValidationError::Duplicate {
                            name,
                            candidate: candidate.origin,
                            existing: existing.origin().to_owned(),
                        };
                        warn!(error = %e, "Duplicate command name, skipping");
                        report.loaded -= 1;
                        report.skipped += 1;
                        continue;
                    }
                }
            }
            info!(command = %name, origin = %candidate.origin, "Loaded command");
            self.table
                .commands
                .insert(name, descriptor.with_timeout(self.timeout));
        }

        info!(
            location = %source.location(),
            loaded = report.loaded,
            skipped = report.skipped,
            total = self.table.len(),
            "Command source loaded"
        );
        report
    }

    /// Finishes loading.
    pub fn finish(self) -> CommandTable {
        self.table
    }

    /// Loads one source with the default policy.
    pub async fn load_all<S>(source: &S) -> CommandTable
    where
        S: PluginSource<Unit = CommandUnit> + ?Sized,
    {
        let mut registry = Self::new();
        registry.load(source).await;
        registry.finish()
    }
}
