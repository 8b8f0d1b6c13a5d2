//! Main runtime orchestration.
//!
//! `run` goes through these phases in order:
//!
//! 1. load the command table: compiled-in commands, then the commands dir;
//! 2. build the shared [`AppContext`];
//! 3. bind the built-in handlers, then compiled-in and directory event
//!    plugins;
//! 4. start the platform adapter and dispatch each event on its own task;
//! 5. stop on Ctrl+C / SIGTERM, or when the adapter's event stream ends.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hamlet_runtime::HamletRuntime;
//!
//! let runtime = HamletRuntime::builder()
//!     .config(config)
//!     .platform(Arc::new(DiscordAdapter::new(token, options)))
//!     .completion(Arc::new(OpenAiClient::new(api_key, settings)?))
//!     .build()?;
//! runtime.run().await?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hamlet_core::{BoxedCompletion, BoxedPlatform, EventSink, GatewayEvent};
use hamlet_framework::{
    AppContext, CommandManifest, CommandTable, CommandUnit, EventArgs, EventBus, EventDispatcher,
    EventManifest, EventUnit, ManifestDir, PluginRegistry, StaticSource, builtin_events,
};
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::{ConfigLoader, HamletConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Why the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown future resolved (a signal, in `run`).
    Shutdown,
    /// The adapter closed its event stream.
    StreamClosed,
}

/// The Hamlet runtime: plugin loading, event loop, shutdown.
pub struct HamletRuntime {
    config: HamletConfig,
    platform: BoxedPlatform,
    completion: BoxedCompletion,
    commands: StaticSource<CommandUnit>,
    events: StaticSource<EventUnit>,
}

impl HamletRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &HamletConfig {
        &self.config
    }

    /// Loads the command table: compiled-in commands first, then the
    /// configured commands directory, so files override code.
    pub async fn load_commands(&self) -> CommandTable {
        let plugins = &self.config.plugins;
        let mut registry = PluginRegistry::new()
            .duplicate_policy(plugins.duplicates)
            .handler_timeout(plugins.handler_timeout());

        registry.load(&self.commands).await;
        if let Some(dir) = &plugins.commands_dir {
            let source = ManifestDir::<CommandManifest>::new(dir).extension(&plugins.extension);
            registry.load(&source).await;
        }

        let table = registry.finish();
        info!(commands = ?table.names(), "Command table ready");
        table
    }

    /// Binds the built-in handlers, then every event plugin.
    pub async fn register_events(&self, bus: Arc<EventBus>) -> EventDispatcher {
        let plugins = &self.config.plugins;
        let dispatcher = EventDispatcher::new(bus).handler_timeout(plugins.handler_timeout());

        dispatcher.register_all(&builtin_events()).await;
        dispatcher.register_all(&self.events).await;
        if let Some(dir) = &plugins.events_dir {
            let source = ManifestDir::<EventManifest>::new(dir).extension(&plugins.extension);
            dispatcher.register_all(&source).await;
        }

        debug!(triggers = ?dispatcher.bus().triggers(), "Event bus ready");
        dispatcher
    }

    /// Runs until Ctrl+C, SIGTERM, or the end of the event stream.
    pub async fn run(&self) -> RuntimeResult<StopReason> {
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until `shutdown` resolves or the event stream ends.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<StopReason>
    where
        F: Future<Output = ()>,
    {
        let table = self.load_commands().await;
        let specs = table.specs();
        let app = Arc::new(AppContext::new(
            table,
            Arc::clone(&self.completion),
            self.config.responder.clone(),
        ));
        let dispatcher = self.register_events(Arc::new(EventBus::new())).await;

        let (sink, mut events) = EventSink::channel(self.config.platform.event_queue);
        let platform = self.platform.name();
        self.platform.start(sink, specs).await?;
        info!(platform, "Hamlet runtime is now running. Press Ctrl+C to stop.");

        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        let reason = loop {
            tokio::select! {
                _ = &mut shutdown => break StopReason::Shutdown,
                event = events.recv() => match event {
                    Some(event) => spawn_dispatch(&mut tasks, &dispatcher, &app, event),
                    None => {
                        warn!(platform, "Event stream closed");
                        break StopReason::StreamClosed;
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Dispatch task panicked");
                    }
                }
            }
        };

        info!(?reason, "Stopping Hamlet runtime");
        self.platform.shutdown().await;
        self.drain(tasks).await;
        info!("Runtime stopped");
        Ok(reason)
    }

    async fn drain(&self, mut tasks: JoinSet<()>) {
        if tasks.is_empty() {
            return;
        }
        let grace = Duration::from_secs(self.config.platform.shutdown_grace_secs);
        debug!(in_flight = tasks.len(), ?grace, "Waiting for in-flight handlers");
        let drained = tokio::time::timeout(grace, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(aborted = tasks.len(), "Handlers still running after grace period, aborting");
            tasks.shutdown().await;
        }
    }
}

fn spawn_dispatch(
    tasks: &mut JoinSet<()>,
    dispatcher: &EventDispatcher,
    app: &Arc<AppContext>,
    event: GatewayEvent,
) {
    let trigger = event.trigger();
    let dispatcher = dispatcher.clone();
    let args = EventArgs::new(Arc::clone(app), event);
    let span = info_span!("dispatch", trigger);
    tasks.spawn(
        async move {
            let report = dispatcher.dispatch(trigger, args).await;
            debug!(completed = report.completed, failed = report.failed, "Dispatch finished");
        }
        .instrument(span),
    );
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM).
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "Cannot listen for SIGTERM, only Ctrl+C will stop the bot"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!(error = %e, "Cannot listen for Ctrl+C"),
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`HamletRuntime`].
pub struct RuntimeBuilder {
    config: Option<HamletConfig>,
    config_loader: ConfigLoader,
    platform: Option<BoxedPlatform>,
    completion: Option<BoxedCompletion>,
    commands: Option<StaticSource<CommandUnit>>,
    events: Option<StaticSource<EventUnit>>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config: None,
            config_loader: ConfigLoader::new().with_current_dir().with_user_config_dir(),
            platform: None,
            completion: None,
            commands: None,
            events: None,
        }
    }

    /// Uses an already-loaded configuration instead of loading one.
    pub fn config(mut self, config: HamletConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the messaging platform.
    pub fn platform(mut self, platform: BoxedPlatform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the language-model client.
    pub fn completion(mut self, completion: BoxedCompletion) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Replaces the compiled-in command table (default: every `#[command]`).
    pub fn commands(mut self, commands: StaticSource<CommandUnit>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Replaces the compiled-in event table (default: every `#[event]`).
    pub fn events(mut self, events: StaticSource<EventUnit>) -> Self {
        self.events = Some(events);
        self
    }

    /// Builds the runtime and installs logging.
    pub fn build(self) -> RuntimeResult<HamletRuntime> {
        let config = match self.config {
            Some(config) => {
                validate_config(&config)?;
                config
            }
            None => self.config_loader.load()?,
        };
        logging::init_from_config(&config.logging);

        let platform = self.platform.ok_or(RuntimeError::MissingComponent("platform"))?;
        let completion = self
            .completion
            .ok_or(RuntimeError::MissingComponent("completion client"))?;

        info!(
            log_level = %config.logging.level,
            platform = platform.name(),
            "Runtime initialized from configuration"
        );

        Ok(HamletRuntime {
            config,
            platform,
            completion,
            commands: self.commands.unwrap_or_else(StaticSource::commands),
            events: self.events.unwrap_or_else(StaticSource::events),
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
