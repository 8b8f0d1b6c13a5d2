//! Event handlers every bot has.

use std::future::Future;
use std::sync::Arc;

use hamlet_core::{GatewayEvent, triggers};
use tracing::info;

use crate::command;
use crate::event::{EventArgs, EventUnit};
use crate::handler::{self, HandlerResult};
use crate::plugin::StaticSource;
use crate::responder;

/// Binds `ready`, `interactionCreate` and `messageCreate` to the framework's
/// own handlers. All three repeat.
pub fn builtin_events() -> StaticSource<EventUnit> {
    StaticSource::new("built-in events")
        .with("hamlet_framework::builtin::ready", || unit(triggers::READY, on_ready))
        .with("hamlet_framework::builtin::interaction_create", || {
            unit(triggers::INTERACTION_CREATE, on_interaction)
        })
        .with("hamlet_framework::builtin::message_create", || {
            unit(triggers::MESSAGE_CREATE, on_message)
        })
}

fn unit<F, Fut>(trigger: &str, f: F) -> EventUnit
where
    F: Fn(EventArgs) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    EventUnit {
        name: Some(trigger.to_owned()),
        once: false,
        execute: Some(handler::event_service(f)),
        ..EventUnit::default()
    }
}

async fn on_ready(args: EventArgs) -> HandlerResult {
    if let GatewayEvent::Ready(identity) = args.event {
        info!("Logged in as {}!", identity.tag);
        args.app.set_identity(identity);
    }
    Ok(())
}

async fn on_interaction(args: EventArgs) -> HandlerResult {
    if let GatewayEvent::InteractionCreate(interaction) = args.event {
        command::handle_interaction(&args.app, interaction).await;
    }
    Ok(())
}

async fn on_message(args: EventArgs) -> HandlerResult {
    if let GatewayEvent::MessageCreate(message) = args.event {
        responder::handle_message(&args.app, Arc::as_ref(&message)).await;
    }
    Ok(())
}
