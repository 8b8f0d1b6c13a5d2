//! Discord gateway adapter.
//!
//! The adapter owns the serenity client for the lifetime of the session. The
//! client runs on its own task; events reach the runtime through the
//! [`EventSink`] handed to [`Platform::start`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hamlet_core::{CommandData, EventSink, Platform, PlatformError, PlatformResult};
use parking_lot::Mutex;
use serenity::Client;
use serenity::all::{GatewayError, GatewayIntents, ShardManager};
use tracing::{debug, error, info};

use crate::config::DiscordOptions;
use crate::handler::{Handler, SinkSlot};

/// Connects to Discord with a bot token.
pub struct DiscordAdapter {
    token: String,
    options: DiscordOptions,
    shards: Mutex<Option<Arc<ShardManager>>>,
}

impl DiscordAdapter {
    /// Creates an adapter. Nothing connects until [`Platform::start`].
    pub fn new(token: impl Into<String>, options: DiscordOptions) -> Self {
        Self {
            token: token.into(),
            options,
            shards: Mutex::new(None),
        }
    }

    /// Gateway intents the adapter subscribes to.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    pub fn options(&self) -> &DiscordOptions {
        &self.options
    }
}

impl fmt::Debug for DiscordAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordAdapter")
            .field("options", &self.options)
            .field("connected", &self.shards.lock().is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Platform for DiscordAdapter {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn start(&self, sink: EventSink, commands: Vec<CommandData>) -> PlatformResult<()> {
        let slot: SinkSlot = Arc::new(Mutex::new(Some(sink)));
        let handler = Handler::new(Arc::clone(&slot), commands, self.options.clone());

        let mut client = Client::builder(&self.token, Self::intents())
            .event_handler(handler)
            .await
            .map_err(|e| PlatformError::Login(e.to_string()))?;
        *self.shards.lock() = Some(Arc::clone(&client.shard_manager));

        tokio::spawn(async move {
            if let Err(e) = client.start().await {
                let e = session_error(e);
                error!(error = %e, "Discord gateway session ended with an error");
            }
            slot.lock().take();
            debug!("Discord event stream closed");
        });

        info!("Discord client started");
        Ok(())
    }

    async fn shutdown(&self) {
        let shards = self.shards.lock().take();
        if let Some(shards) = shards {
            shards.shutdown_all().await;
            info!("Discord client disconnected");
        }
    }
}

/// Maps the error that ended a running gateway session. A rejected token
/// only surfaces here, once the first shard identifies.
fn session_error(err: serenity::Error) -> PlatformError {
    match err {
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => {
            PlatformError::Login("Discord rejected the bot token".into())
        }
        other => PlatformError::Gateway(other.to_string()),
    }
}
