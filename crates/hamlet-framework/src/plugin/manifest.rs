//! Plugins declared as TOML files in a directory.
//!
//! A command manifest:
//!
//! ```toml
//! [data]
//! name = "ping"
//! description = "Replies with Pong!"
//!
//! [execute]
//! reply = "Pong!"
//! ephemeral = false
//! ```
//!
//! An event manifest:
//!
//! ```toml
//! name = "ready"
//! once = true
//!
//! [execute]
//! log = "Session is up"
//! ```
//!
//! Both may carry a free-form `[metadata]` table.

use std::ffi::OsStr;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hamlet_core::{CommandData, Reply};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, trace};

use crate::command::CommandUnit;
use crate::error::{DiscoveryError, LoadError};
use crate::event::EventUnit;
use crate::handler;
use crate::plugin::{Locator, PluginCandidate, PluginSource, Validate};

/// A file format that materializes into a plugin unit.
pub trait Manifest: DeserializeOwned + Send + 'static {
    /// The unit this manifest becomes.
    type Unit: Validate + Send + 'static;

    /// Builds the unit. `origin` names the file in handler logs.
    fn into_unit(self, origin: &str) -> Self::Unit;
}

// ─── Command manifests ────────────────────────────────────────────────────────

/// The `[data]` table. Fields are optional so that validation, not parsing,
/// reports a missing name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestData {
    /// Command name.
    pub name: Option<String>,
    /// Command description.
    #[serde(default)]
    pub description: String,
}

/// Answers the invocation with fixed text.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyAction {
    /// Reply body.
    pub reply: String,
    /// Whether only the invoker sees the reply.
    #[serde(default)]
    pub ephemeral: bool,
}

/// A command declared in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandManifest {
    /// Metadata.
    pub data: Option<ManifestData>,
    /// Action.
    pub execute: Option<ReplyAction>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Manifest for CommandManifest {
    type Unit = CommandUnit;

    fn into_unit(self, _origin: &str) -> CommandUnit {
        let data = self.data.and_then(|d| {
            d.name
                .map(|name| CommandData::new(name, d.description))
        });
        let execute = self.execute.map(|action| {
            handler::command_service(move |ctx| {
                let reply = Reply {
                    content: action.reply.clone(),
                    ephemeral: action.ephemeral,
                };
                async move {
                    ctx.interaction.reply(reply).await?;
                    Ok(())
                }
            })
        });
        CommandUnit {
            data,
            execute,
            metadata: self.metadata,
        }
    }
}

// ─── Event manifests ──────────────────────────────────────────────────────────

/// Writes a log line when the event fires.
#[derive(Debug, Clone, Deserialize)]
pub struct LogAction {
    /// Log message.
    pub log: String,
}

/// An event handler declared in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct EventManifest {
    /// Trigger name.
    pub name: Option<String>,
    /// Whether the handler fires only once.
    #[serde(default)]
    pub once: bool,
    /// Action.
    pub execute: Option<LogAction>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Manifest for EventManifest {
    type Unit = EventUnit;

    fn into_unit(self, origin: &str) -> EventUnit {
        let origin = origin.to_owned();
        let execute = self.execute.map(|action| {
            handler::event_service(move |args| {
                info!(trigger = args.event.trigger(), origin = %origin, "{}", action.log);
                async { Ok(()) }
            })
        });
        EventUnit {
            name: self.name,
            once: self.once,
            execute,
            metadata: self.metadata,
        }
    }
}

// ─── ManifestDir ──────────────────────────────────────────────────────────────

/// Reads manifests of type `M` from one directory.
///
/// Only files whose extension equals the configured one are candidates.
/// Candidates are ordered by file name so that load order, and therefore
/// which duplicate wins, does not depend on the file system.
pub struct ManifestDir<M> {
    dir: PathBuf,
    extension: String,
    _manifest: PhantomData<fn() -> M>,
}

impl<M> ManifestDir<M> {
    /// Reads `dir`, accepting files ending in `.toml`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "toml".to_owned(),
            _manifest: PhantomData,
        }
    }

    /// Accepts files ending in `.{extension}` instead.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_owned();
        self
    }

    /// The directory being read.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(&self.extension))
    }
}

impl<M> fmt::Debug for ManifestDir<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestDir")
            .field("dir", &self.dir)
            .field("extension", &self.extension)
            .finish()
    }
}

#[async_trait]
impl<M: Manifest> PluginSource for ManifestDir<M> {
    type Unit = M::Unit;

    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    async fn discover(&self) -> Result<Vec<PluginCandidate>, DiscoveryError> {
        let unreadable = |source| DiscoveryError::Unreadable {
            location: self.location(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(unreadable)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            let path = entry.path();
            trace!(path = %path.display(), "Directory entry");
            if self.accepts(&path) {
                paths.push(path);
            } else {
                debug!(path = %path.display(), extension = %self.extension, "Ignoring file with other extension");
            }
        }
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| PluginCandidate {
                origin: path.display().to_string(),
                locator: Locator::Path(path),
            })
            .collect())
    }

    async fn materialize(&self, candidate: &PluginCandidate) -> Result<M::Unit, LoadError> {
        let Locator::Path(path) = &candidate.locator else {
            return Err(LoadError::Unknown(candidate.origin.clone()));
        };
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Read {
                candidate: candidate.origin.clone(),
                source,
            })?;
        let manifest: M = toml::from_str(&text).map_err(|e| LoadError::Parse {
            candidate: candidate.origin.clone(),
            reason: e.message().to_owned(),
        })?;
        Ok(manifest.into_unit(&candidate.origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write(dir: &Path, name: &str, body: &str) {
        tokio::fs::write(dir.join(name), body).await.unwrap();
    }

    #[tokio::test]
    async fn test_discover_filters_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "b.toml", "").await;
        write(tmp.path(), "a.toml", "").await;
        write(tmp.path(), "notes.md", "").await;
        write(tmp.path(), "c.toml.bak", "").await;

        let source = ManifestDir::<CommandManifest>::new(tmp.path());
        let names: Vec<String> = source
            .discover()
            .await
            .unwrap()
            .iter()
            .map(|c| match &c.locator {
                Locator::Path(p) => p.file_name().unwrap().to_string_lossy().into_owned(),
                Locator::Index(_) => unreachable!(),
            })
            .collect();
        assert_eq!(names, ["a.toml", "b.toml"]);
    }

    #[tokio::test]
    async fn test_custom_extension() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.toml", "").await;
        write(tmp.path(), "b.plugin", "").await;

        let source = ManifestDir::<EventManifest>::new(tmp.path()).extension(".plugin");
        let found = source.discover().await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].origin.ends_with("b.plugin"));
    }

    #[tokio::test]
    async fn test_missing_dir_is_discovery_error() {
        let tmp = tempfile::tempdir().unwrap();
        let source = ManifestDir::<CommandManifest>::new(tmp.path().join("absent"));
        assert!(matches!(
            source.discover().await,
            Err(DiscoveryError::Unreadable { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "bad.toml", "[data\nname = ").await;
        let source = ManifestDir::<CommandManifest>::new(tmp.path());
        let candidates = source.discover().await.unwrap();
        assert!(matches!(
            source.materialize(&candidates[0]).await,
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn test_command_manifest_without_name_has_no_data() {
        let manifest: CommandManifest = toml::from_str(
            r#"
            [data]
            description = "nameless"

            [execute]
            reply = "hi"
            "#,
        )
        .unwrap();
        let unit = manifest.into_unit("x.toml");
        assert!(unit.data.is_none());
        assert!(unit.execute.is_some());
    }

    #[test]
    fn test_event_manifest_metadata() {
        let manifest: EventManifest = toml::from_str(
            r#"
            name = "ready"
            once = true

            [execute]
            log = "up"

            [metadata]
            owner = "ops"
            "#,
        )
        .unwrap();
        assert!(manifest.once);
        assert_eq!(manifest.metadata["owner"], "ops");
    }
}
