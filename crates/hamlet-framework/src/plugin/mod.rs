//! Plugin discovery and loading.
//!
//! A plugin is a named unit with an execute handler. Plugins come from
//! [`PluginSource`]s, which are read in three steps:
//!
//! 1. **discover**: list candidates in a stable order;
//! 2. **materialize**: turn one candidate into a raw unit;
//! 3. **validate**: check the unit has a name and a handler.
//!
//! A failure in step 1 empties the source. A failure in step 2 or 3 skips the
//! one candidate and loading continues. Every step is logged.
//!
//! Two sources ship with the framework:
//!
//! - [`StaticSource`] reads handlers compiled into the binary with the
//!   `#[command]` and `#[event]` attributes;
//! - [`ManifestDir`] reads TOML manifests from a directory.

mod manifest;
mod registry;
mod source;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::error::{DiscoveryError, LoadError, ValidationError};

pub use manifest::{
    CommandManifest, EventManifest, LogAction, Manifest, ManifestData, ManifestDir, ReplyAction,
};
pub use registry::{CommandTable, DuplicatePolicy, LoadReport, PluginRegistry};
pub use source::{COMMANDS, CommandRegistration, EVENTS, EventRegistration, StaticSource};

// ─── Candidates ───────────────────────────────────────────────────────────────

/// Where a candidate can be found inside its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A file on disk.
    Path(PathBuf),
    /// An entry in an in-memory table.
    Index(usize),
}

/// One discovered, not yet loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginCandidate {
    /// Human-readable origin, used in every log line about this candidate.
    pub origin: String,
    /// How the source finds the candidate again.
    pub locator: Locator,
}

impl fmt::Display for PluginCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

// ─── Traits ───────────────────────────────────────────────────────────────────

/// Checks that a raw unit has the shape of a plugin.
pub trait Validate: Sized {
    /// The validated form.
    type Descriptor;

    /// Validates the unit loaded from `candidate`.
    fn validate(self, candidate: &PluginCandidate) -> Result<Self::Descriptor, ValidationError>;
}

/// A place plugins are loaded from.
#[async_trait]
pub trait PluginSource: Send + Sync {
    /// The raw unit a candidate materializes into.
    type Unit: Validate + Send;

    /// Describes the source for logs.
    fn location(&self) -> String;

    /// Lists candidates in a deterministic order.
    async fn discover(&self) -> Result<Vec<PluginCandidate>, DiscoveryError>;

    /// Loads one candidate.
    async fn materialize(&self, candidate: &PluginCandidate) -> Result<Self::Unit, LoadError>;
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// Reads every valid plugin from `source`, in enumeration order.
///
/// Returns each descriptor together with its candidate plus the number of
/// candidates that were skipped.
pub async fn collect<S>(
    source: &S,
) -> (
    Vec<(PluginCandidate, <S::Unit as Validate>::Descriptor)>,
    LoadReport,
)
where
    S: PluginSource + ?Sized,
{
    let location = source.location();
    info!(%location, "Loading plugins");

    let candidates = match source.discover().await {
        Ok(candidates) => candidates,
        Err(e) => {
            error!(%location, error = %e, "Failed to enumerate plugin source");
            return (Vec::new(), LoadReport::default());
        }
    };

    let mut report = LoadReport {
        discovered: candidates.len(),
        ..LoadReport::default()
    };
    let mut loaded = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        debug!(%location, candidate = %candidate, "Found plugin candidate");

        let unit = match source.materialize(&candidate).await {
            Ok(unit) => unit,
            Err(e) => {
                error!(candidate = %candidate, error = %e, "Failed to load plugin, skipping");
                report.skipped += 1;
                continue;
            }
        };

        match unit.validate(&candidate) {
            Ok(descriptor) => loaded.push((candidate, descriptor)),
            Err(e) => {
                warn!(candidate = %candidate, error = %e, "Plugin is missing a required property, skipping");
                report.skipped += 1;
            }
        }
    }

    report.loaded = loaded.len();
    (loaded, report)
}

fn non_empty(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.trim().is_empty())
}

pub(crate) fn require_name(
    name: Option<String>,
    candidate: &PluginCandidate,
) -> Result<String, ValidationError> {
    non_empty(name).ok_or_else(|| ValidationError::MissingName {
        candidate: candidate.origin.clone(),
    })
}

pub(crate) fn require_handler<H>(
    handler: Option<H>,
    candidate: &PluginCandidate,
) -> Result<H, ValidationError> {
    handler.ok_or_else(|| ValidationError::MissingHandler {
        candidate: candidate.origin.clone(),
    })
}
