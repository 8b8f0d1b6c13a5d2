//! Slash-command interactions.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hamlet_core::{ApiError, ApiResult, Interaction, Reply};
use serenity::all::{
    CommandInteraction, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage,
};
use serenity::http::Http;
use tracing::trace;

/// Maps a serenity error onto the platform-neutral [`ApiError`].
pub(crate) fn api_error(err: serenity::Error) -> ApiError {
    match err {
        serenity::Error::Http(e) => ApiError::Rejected(e.to_string()),
        serenity::Error::Gateway(_) => ApiError::NotConnected,
        other => ApiError::Other(other.to_string()),
    }
}

/// Discord drops an interaction that has no initial response after 3 seconds.
const RESPONSE_DEADLINE: Duration = Duration::from_secs(3);

async fn within<T>(
    deadline: Duration,
    call: impl Future<Output = serenity::Result<T>>,
) -> ApiResult<T> {
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result.map_err(api_error),
        Err(_) => Err(ApiError::Timeout),
    }
}

/// A chat-input command invocation.
///
/// Tracks whether the interaction has been answered so the command path can
/// choose between a reply and a follow-up.
pub struct DiscordInteraction {
    http: Arc<Http>,
    command: CommandInteraction,
    replied: AtomicBool,
    deferred: AtomicBool,
}

impl DiscordInteraction {
    pub fn new(http: Arc<Http>, command: CommandInteraction) -> Self {
        Self {
            http,
            command,
            replied: AtomicBool::new(false),
            deferred: AtomicBool::new(false),
        }
    }

    /// The underlying serenity interaction.
    pub fn inner(&self) -> &CommandInteraction {
        &self.command
    }

    fn acknowledged(&self) -> bool {
        self.replied() || self.deferred()
    }
}

#[async_trait]
impl Interaction for DiscordInteraction {
    fn command_name(&self) -> &str {
        &self.command.data.name
    }

    fn user_tag(&self) -> String {
        self.command.user.tag()
    }

    fn replied(&self) -> bool {
        self.replied.load(Ordering::Acquire)
    }

    fn deferred(&self) -> bool {
        self.deferred.load(Ordering::Acquire)
    }

    async fn reply(&self, reply: Reply) -> ApiResult<()> {
        if self.acknowledged() {
            return Err(ApiError::AlreadyAcknowledged);
        }
        let message = CreateInteractionResponseMessage::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral);
        let response = CreateInteractionResponse::Message(message);
        within(
            RESPONSE_DEADLINE,
            self.command.create_response(&self.http, response),
        )
        .await?;
        self.replied.store(true, Ordering::Release);
        trace!(command = %self.command.data.name, "Interaction replied");
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> ApiResult<()> {
        if self.acknowledged() {
            return Err(ApiError::AlreadyAcknowledged);
        }
        if ephemeral {
            within(RESPONSE_DEADLINE, self.command.defer_ephemeral(&self.http)).await?;
        } else {
            within(RESPONSE_DEADLINE, self.command.defer(&self.http)).await?;
        }
        self.deferred.store(true, Ordering::Release);
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> ApiResult<()> {
        if !self.acknowledged() {
            return Err(ApiError::Other(
                "cannot follow up an interaction that was never acknowledged".into(),
            ));
        }
        let followup = CreateInteractionResponseFollowup::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral);
        self.command
            .create_followup(&self.http, followup)
            .await
            .map_err(api_error)?;
        Ok(())
    }
}
