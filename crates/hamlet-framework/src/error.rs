//! Error types for plugin loading and command lookup.

use std::io;

use thiserror::Error;

/// A plugin source could not be enumerated.
///
/// The loader logs this and treats the source as empty.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The plugin directory could not be read.
    #[error("cannot read plugin directory '{location}': {source}")]
    Unreadable {
        /// Directory path.
        location: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A single candidate failed to load. Only that candidate is skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The candidate file could not be read.
    #[error("cannot read '{candidate}': {source}")]
    Read {
        /// Candidate origin.
        candidate: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The candidate file is not a valid manifest.
    #[error("cannot parse '{candidate}': {reason}")]
    Parse {
        /// Candidate origin.
        candidate: String,
        /// Parser message.
        reason: String,
    },

    /// A compiled-in plugin factory refused to build its unit.
    #[error("cannot build '{candidate}': {reason}")]
    Factory {
        /// Candidate origin.
        candidate: String,
        /// Factory message.
        reason: String,
    },

    /// The candidate refers to something the source does not hold.
    #[error("unknown candidate '{0}'")]
    Unknown(String),
}

/// A loaded unit does not have the shape of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No name (or an empty one) was declared.
    #[error("'{candidate}' is missing a required name")]
    MissingName {
        /// Candidate origin.
        candidate: String,
    },

    /// No execute handler was declared.
    #[error("'{candidate}' is missing a required execute handler")]
    MissingHandler {
        /// Candidate origin.
        candidate: String,
    },

    /// The name is already taken and the registry rejects duplicates.
    #[error("'{candidate}' declares '{name}', which is already registered by '{existing}'")]
    Duplicate {
        /// Conflicting name.
        name: String,
        /// Candidate origin.
        candidate: String,
        /// Origin of the plugin that already holds the name.
        existing: String,
    },
}

/// No command is registered under the requested name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No command matching {name} was found.")]
pub struct NotFound {
    /// The name that was looked up.
    pub name: String,
}
