//! Type-erased handler services.
//!
//! Command and event handlers are stored as [`BoxCloneSyncService`]s so that
//! compiled-in functions, manifest actions and closures all share one shape,
//! and so that tower layers (such as a timeout) can wrap any of them.

use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use hamlet_core::BoxError;
use tower::timeout::Timeout;
use tower::util::BoxCloneSyncService;
use tower::{ServiceExt, service_fn};

use crate::command::CommandContext;
use crate::event::EventArgs;

/// What every handler returns.
pub type HandlerResult = Result<(), BoxError>;

/// Erased handler for slash commands.
pub type CommandService = BoxCloneSyncService<CommandContext, (), BoxError>;

/// Erased handler for gateway events.
pub type EventService = BoxCloneSyncService<EventArgs, (), BoxError>;

/// Function pointer shape used by compiled-in command handlers.
pub type CommandFn = fn(CommandContext) -> BoxFuture<'static, HandlerResult>;

/// Function pointer shape used by compiled-in event handlers.
pub type EventFn = fn(EventArgs) -> BoxFuture<'static, HandlerResult>;

/// Wraps an async closure as a [`CommandService`].
pub fn command_service<F, Fut>(f: F) -> CommandService
where
    F: Fn(CommandContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    BoxCloneSyncService::new(service_fn(f))
}

/// Wraps an async closure as an [`EventService`].
pub fn event_service<F, Fut>(f: F) -> EventService
where
    F: Fn(EventArgs) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    BoxCloneSyncService::new(service_fn(f))
}

/// Applies an optional deadline to a handler.
///
/// A handler that runs past the deadline fails with tower's `Elapsed` error.
pub fn with_timeout<R>(
    service: BoxCloneSyncService<R, (), BoxError>,
    timeout: Option<Duration>,
) -> BoxCloneSyncService<R, (), BoxError>
where
    R: Send + 'static,
{
    match timeout {
        Some(limit) => BoxCloneSyncService::new(Timeout::new(service, limit)),
        None => service,
    }
}

/// Runs a handler service once.
pub(crate) async fn call<R>(
    service: &BoxCloneSyncService<R, (), BoxError>,
    request: R,
) -> HandlerResult
where
    R: Send + 'static,
{
    service.clone().oneshot(request).await
}
