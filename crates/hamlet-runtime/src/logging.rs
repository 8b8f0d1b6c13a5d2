//! Logging setup.
//!
//! All diagnostics go through `tracing`. This module installs a
//! `tracing-subscriber` registry with an [`EnvFilter`] and a single fmt layer.
//! `RUST_LOG`, when set, replaces the configured base level; per-module
//! filters from `[logging.filters]` are added on top either way.
//!
//! ```rust,ignore
//! use hamlet_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .with_level(tracing::Level::DEBUG)
//!     .directive("serenity=warn")
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the subscriber described by `config`. Does nothing if a global
/// subscriber is already set.
pub fn init_from_config(config: &LoggingConfig) {
    LoggingBuilder::from_config(config).init();
}

/// Collects filter directives and layer options, then installs them once.
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    level: Option<Level>,
    directives: Vec<String>,
    format: LogFormat,
    output: LogOutput,
    file_path: Option<PathBuf>,
    span_lifecycle: bool,
    thread_ids: bool,
    file_location: bool,
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirrors the `[logging]` section. Filters are applied in module order
    /// so the resulting directive list is stable.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut filters: Vec<_> = config.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));

        Self {
            level: Some(config.level.to_tracing_level()),
            directives: filters
                .into_iter()
                .map(|(module, level)| format!("{module}={level}"))
                .collect(),
            format: config.format,
            output: config.output,
            file_path: config.file_path.clone(),
            span_lifecycle: config.span_lifecycle,
            thread_ids: config.thread_ids,
            file_location: config.file_location,
        }
    }

    /// Base level used when `RUST_LOG` is unset. Defaults to `INFO`.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds a filter directive, e.g. `hamlet_framework=debug`.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Target file for [`LogOutput::File`].
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Emits an event when a span opens and closes (each dispatch runs in one).
    pub fn span_lifecycle(mut self, enabled: bool) -> Self {
        self.span_lifecycle = enabled;
        self
    }

    fn filter(&self) -> EnvFilter {
        let base = self.level.unwrap_or(Level::INFO).to_string().to_lowercase();
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base));
        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                // No subscriber exists yet to report this through.
                Err(e) => eprintln!("Ignoring invalid log directive {directive:?}: {e}"),
            }
        }
        filter
    }

    /// Picks the writer. Returns `false` as the second value when file output
    /// was requested without a path and stdout is used instead.
    fn writer(&self) -> (BoxMakeWriter, bool) {
        match (self.output, self.file_path.as_deref()) {
            (LogOutput::Stdout, _) => (BoxMakeWriter::new(std::io::stdout), true),
            (LogOutput::Stderr, _) => (BoxMakeWriter::new(std::io::stderr), true),
            (LogOutput::File, Some(path)) => {
                let appender = tracing_appender::rolling::never(
                    path.parent().unwrap_or_else(|| Path::new(".")),
                    path.file_name().unwrap_or_else(|| OsStr::new("hamlet.log")),
                );
                (BoxMakeWriter::new(appender), true)
            }
            (LogOutput::File, None) => (BoxMakeWriter::new(std::io::stdout), false),
        }
    }

    fn layer(&self, writer: BoxMakeWriter) -> BoxedLayer {
        let span_events = if self.span_lifecycle {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let base = fmt::layer()
            .with_writer(writer)
            .with_span_events(span_events)
            .with_thread_ids(self.thread_ids)
            .with_file(self.file_location)
            .with_line_number(self.file_location);

        match self.format {
            LogFormat::Compact => base.compact().boxed(),
            LogFormat::Full => base.boxed(),
            LogFormat::Pretty => base.pretty().boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => base.json().boxed(),
        }
    }

    /// Installs the subscriber, ignoring one that is already installed.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber, failing if a global one already exists.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let (writer, as_requested) = self.writer();
        tracing_subscriber::registry()
            .with(self.layer(writer))
            .with(self.filter())
            .try_init()?;

        if !as_requested {
            tracing::warn!("File output requested but no file path configured, logging to stdout");
        }
        Ok(())
    }
}
