//! Inbound chat messages.

use std::sync::Arc;

use async_trait::async_trait;
use hamlet_core::{ApiResult, ChannelKind, IncomingMessage};
use serenity::all::{CreateMessage, GuildId, Message};
use serenity::http::Http;

use crate::interaction::api_error;

/// Direct messages carry no guild.
pub(crate) fn channel_kind(guild: Option<GuildId>) -> ChannelKind {
    match guild {
        Some(_) => ChannelKind::Guild,
        None => ChannelKind::Direct,
    }
}

/// A Discord message together with the HTTP client needed to answer it.
pub struct DiscordMessage {
    http: Arc<Http>,
    message: Message,
}

impl DiscordMessage {
    pub fn new(http: Arc<Http>, message: Message) -> Self {
        Self { http, message }
    }

    /// The underlying serenity message.
    pub fn inner(&self) -> &Message {
        &self.message
    }
}

#[async_trait]
impl IncomingMessage for DiscordMessage {
    fn content(&self) -> &str {
        &self.message.content
    }

    fn author_id(&self) -> u64 {
        self.message.author.id.get()
    }

    fn author_is_bot(&self) -> bool {
        self.message.author.bot
    }

    fn channel_kind(&self) -> ChannelKind {
        channel_kind(self.message.guild_id)
    }

    fn mentions(&self, user_id: u64) -> bool {
        self.message.mentions.iter().any(|user| user.id.get() == user_id)
    }

    async fn send_to_channel(&self, content: &str) -> ApiResult<()> {
        self.message
            .channel_id
            .send_message(&self.http, CreateMessage::new().content(content))
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn send_to_author(&self, content: &str) -> ApiResult<()> {
        self.message
            .author
            .direct_message(&self.http, CreateMessage::new().content(content))
            .await
            .map_err(api_error)?;
        Ok(())
    }
}
