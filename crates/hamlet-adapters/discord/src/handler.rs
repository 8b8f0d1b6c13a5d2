//! serenity event handler that feeds the runtime's event queue.

use std::sync::Arc;

use async_trait::async_trait;
use hamlet_core::{BotIdentity, CommandData, EventSink, GatewayEvent};
use parking_lot::Mutex;
use serenity::all::{
    Command, CommandType, Context, CreateCommand, EventHandler, Interaction as DiscordEvent,
    Message, Ready,
};
use tracing::{debug, error, info, trace, warn};

use crate::config::DiscordOptions;
use crate::interaction::DiscordInteraction;
use crate::message::DiscordMessage;

/// Shared handle on the event sink. Emptied when the gateway session ends, so
/// the runtime sees its event stream close.
pub(crate) type SinkSlot = Arc<Mutex<Option<EventSink>>>;

/// Builds the global command payload from the loaded command table.
pub(crate) fn command_payload(commands: &[CommandData]) -> Vec<CreateCommand> {
    commands
        .iter()
        .map(|c| CreateCommand::new(&c.name).description(&c.description))
        .collect()
}

pub(crate) struct Handler {
    sink: SinkSlot,
    commands: Vec<CommandData>,
    options: DiscordOptions,
}

impl Handler {
    pub(crate) fn new(sink: SinkSlot, commands: Vec<CommandData>, options: DiscordOptions) -> Self {
        Self {
            sink,
            commands,
            options,
        }
    }

    async fn forward(&self, event: GatewayEvent) {
        let Some(sink) = self.sink.lock().clone() else {
            trace!(trigger = event.trigger(), "Adapter stopped, dropping event");
            return;
        };
        if let Err(e) = sink.emit(event).await {
            warn!(error = %e, "Failed to forward Discord event");
        }
    }

    async fn publish_commands(&self, ctx: &Context) {
        let payload = command_payload(&self.commands);
        match Command::set_global_commands(&ctx.http, payload).await {
            Ok(published) => info!(count = published.len(), "Published application commands"),
            Err(e) => error!(error = %e, "Failed to publish application commands"),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        debug!(guilds = ready.guilds.len(), "Discord session ready");
        if self.options.register_commands {
            self.publish_commands(&ctx).await;
        }
        let identity = BotIdentity {
            id: ready.user.id.get(),
            tag: ready.user.tag(),
        };
        self.forward(GatewayEvent::Ready(identity)).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: DiscordEvent) {
        match interaction {
            DiscordEvent::Command(command) if command.data.kind == CommandType::ChatInput => {
                let interaction = DiscordInteraction::new(Arc::clone(&ctx.http), command);
                self.forward(GatewayEvent::InteractionCreate(Arc::new(interaction)))
                    .await;
            }
            other => trace!(kind = ?other.kind(), "Ignoring interaction"),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let message = DiscordMessage::new(Arc::clone(&ctx.http), msg);
        self.forward(GatewayEvent::MessageCreate(Arc::new(message)))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_payload_keeps_name_and_description() {
        let payload = command_payload(&[
            CommandData::new("piiing2", "Replies with Pooong!"),
            CommandData::new("ping", "Replies with Pong!"),
        ]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json[0]["name"], "piiing2");
        assert_eq!(json[0]["description"], "Replies with Pooong!");
        assert_eq!(json[1]["name"], "ping");
    }

    #[tokio::test]
    async fn test_forward_after_stop_is_dropped() {
        let (sink, mut rx) = EventSink::channel(1);
        let slot: SinkSlot = Arc::new(Mutex::new(Some(sink)));
        let handler = Handler::new(Arc::clone(&slot), Vec::new(), DiscordOptions::default());

        let identity = BotIdentity {
            id: 1,
            tag: "hamlet#0420".into(),
        };
        handler.forward(GatewayEvent::Ready(identity.clone())).await;
        assert!(matches!(rx.recv().await, Some(GatewayEvent::Ready(id)) if id == identity));

        slot.lock().take();
        handler.forward(GatewayEvent::Ready(identity)).await;
        assert!(rx.recv().await.is_none());
    }
}
