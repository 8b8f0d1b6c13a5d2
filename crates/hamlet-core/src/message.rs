//! Inbound chat messages.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;

/// Where a message was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// One-to-one conversation with the bot.
    Direct,
    /// A channel inside a server.
    Guild,
}

impl ChannelKind {
    /// Returns `true` for direct-message channels.
    pub fn is_direct(self) -> bool {
        matches!(self, Self::Direct)
    }
}

/// A message received from the platform.
#[async_trait]
pub trait IncomingMessage: Send + Sync + 'static {
    /// Raw text content, including any mention tokens.
    fn content(&self) -> &str;

    /// Platform id of the author.
    fn author_id(&self) -> u64;

    /// Whether the author is a bot account.
    fn author_is_bot(&self) -> bool;

    /// Where the message was posted.
    fn channel_kind(&self) -> ChannelKind;

    /// Whether the message explicitly mentions the given user.
    fn mentions(&self, user_id: u64) -> bool;

    /// Posts a message to the channel this message came from.
    async fn send_to_channel(&self, content: &str) -> ApiResult<()>;

    /// Sends a private message to the author.
    async fn send_to_author(&self, content: &str) -> ApiResult<()>;
}

/// A shared message trait object.
pub type BoxedMessage = Arc<dyn IncomingMessage>;
