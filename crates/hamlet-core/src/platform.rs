//! Messaging-platform adapter interface.
//!
//! An adapter logs in, subscribes to the platform's event stream, and pushes
//! every relevant event into an [`EventSink`]. The runtime owns the receiving
//! end and dispatches events to handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::trace;

use crate::command::CommandData;
use crate::error::{PlatformError, PlatformResult};
use crate::event::GatewayEvent;

/// Sending half of the runtime's event queue.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<GatewayEvent>,
}

impl EventSink {
    /// Creates a sink/receiver pair with the given queue capacity.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<GatewayEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Delivers an event to the runtime.
    ///
    /// Waits when the queue is full. Fails only once the runtime has stopped.
    pub async fn emit(&self, event: GatewayEvent) -> PlatformResult<()> {
        trace!(trigger = event.trigger(), "Emitting gateway event");
        self.tx
            .send(event)
            .await
            .map_err(|_| PlatformError::SinkClosed)
    }

    /// Returns `true` once the runtime has dropped the receiver.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A connection to a messaging platform.
#[async_trait]
pub trait Platform: Send + Sync + 'static {
    /// Short adapter name used in logs (e.g. `"discord"`).
    fn name(&self) -> &'static str;

    /// Logs in and starts delivering events into `sink`.
    ///
    /// `commands` lists the loaded slash commands so the adapter can publish
    /// them to the platform. The call returns once the session is running;
    /// event delivery continues in the background.
    async fn start(&self, sink: EventSink, commands: Vec<CommandData>) -> PlatformResult<()>;

    /// Closes the session.
    async fn shutdown(&self);
}

/// A shared platform trait object.
pub type BoxedPlatform = Arc<dyn Platform>;
