//! Slash-command interactions.
//!
//! An [`Interaction`] is a single command invocation delivered by the
//! platform. Handlers answer it with [`Interaction::reply`] (the initial
//! response) or [`Interaction::follow_up`] (any response after the first, or
//! after a deferral).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;

/// An outgoing response to an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message body.
    pub content: String,
    /// When set, only the invoking user can see the response.
    pub ephemeral: bool,
}

impl Reply {
    /// A response visible to everyone in the channel.
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A response visible only to the invoker.
    pub fn private(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// A command invocation received from the platform.
#[async_trait]
pub trait Interaction: Send + Sync + 'static {
    /// Name of the invoked command, exactly as registered.
    fn command_name(&self) -> &str;

    /// Display tag of the invoking user (used in logs).
    fn user_tag(&self) -> String;

    /// `true` once an initial reply has been sent.
    fn replied(&self) -> bool;

    /// `true` once the response has been deferred.
    fn deferred(&self) -> bool;

    /// Sends the initial response.
    async fn reply(&self, reply: Reply) -> ApiResult<()>;

    /// Acknowledges the interaction without content; a follow-up is expected.
    async fn defer(&self, ephemeral: bool) -> ApiResult<()>;

    /// Sends an additional response after a reply or deferral.
    async fn follow_up(&self, reply: Reply) -> ApiResult<()>;
}

/// A shared interaction trait object.
pub type BoxedInteraction = Arc<dyn Interaction>;
