//! Replies to plain chat messages.
//!
//! Two rules apply, in order, to every message not written by a bot:
//!
//! 1. A message whose text equals the trigger phrase gets the canned reply.
//! 2. A direct message, or a message that mentions the bot, is forwarded to
//!    the language model with the mention removed. The model's answer is
//!    posted to the same channel.
//!
//! A message can match both rules and then gets both replies.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use hamlet_core::{BoxError, ChannelKind, IncomingMessage};

use crate::context::AppContext;

/// Who hears about a failed language-model reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureNotice {
    /// DM authors get a private notice; guild messages get one in channel.
    #[default]
    Always,
    /// Only DM authors are notified; guild failures are only logged.
    DirectOnly,
}

/// Text and policy for the message-trigger path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderSettings {
    /// Exact text that triggers the canned reply.
    pub trigger_phrase: String,
    /// The canned reply.
    pub canned_response: String,
    /// System instruction sent with every forwarded message.
    pub system_prompt: String,
    /// Who is told about language-model failures.
    pub failure_notice: FailureNotice,
    /// Text of that notice.
    pub fallback_notice: String,
    /// Sent privately to the invoker when a command handler fails.
    pub command_error_message: String,
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            trigger_phrase: "To be or not to be".to_owned(),
            canned_response: SOLILOQUY.to_owned(),
            system_prompt: "You are a helpful assistant.".to_owned(),
            failure_notice: FailureNotice::default(),
            fallback_notice: "I encountered an error while processing your request.".to_owned(),
            command_error_message: "There was an error while executing this command!".to_owned(),
        }
    }
}

/// Default canned reply.
pub const SOLILOQUY: &str = concat!(
    "that is the question Whether tis nobler in the mind to suffer The slings ",
    "and arrows of outrageous fortune Or to take arms against a sea of ",
    "troubles And by opposing end them To die To sleep No more and by a sleep ",
    "to say we end The heartache and the thousand natural shocks That flesh ",
    "is heir to tis a consummation Devoutly to be wished To die to sleep To ",
    "sleep perchance to dream ay theres the rub For in that sleep of death ",
    "what dreams may come When we have shuffled off this mortal coil Must ",
    "give us pause theres the respect That makes calamity of so long life For ",
    "who would bear the whips and scorns of time The oppressors wrong the ",
    "proud mans contumely The pangs of despised love the laws delay The ",
    "insolence of office and the spurns That patient merit of the unworthy ",
    "takes When he himself might his quietus make With a bare bodkin who ",
    "would fardels bear To grunt and sweat under a weary life But that the ",
    "dread of something after death The undiscovered country from whose bourn ",
    "No traveller returns puzzles the will And makes us rather bear those ",
    "ills we have Than fly to others that we know not of Thus conscience does ",
    "make cowards of us all And thus the native hue of resolution Is sicklied ",
    "oer with the pale cast of thought And enterprises of great pith and ",
    "moment With this regard their currents turn awry And lose the name of ",
    "action Soft you now The fair Ophelia Nymph in thy orisons Be all my sins ",
    "remembered",
);

/// What the responder did with a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageOutcome {
    /// The message was skipped because a bot wrote it.
    pub ignored: bool,
    /// The canned reply was sent.
    pub canned: bool,
    /// The language model was asked; `Some(true)` when its answer was posted.
    pub completion: Option<bool>,
}

/// Removes `<@id>` and `<@!id>` mention tokens for `bot_id` and trims.
pub fn strip_mention(content: &str, bot_id: u64) -> String {
    content
        .replace(&format!("<@!{bot_id}>"), "")
        .replace(&format!("<@{bot_id}>"), "")
        .trim()
        .to_owned()
}

/// Applies the message rules to `message`.
pub async fn handle_message(app: &AppContext, message: &dyn IncomingMessage) -> MessageOutcome {
    let identity = app.identity();
    let own = identity.is_some_and(|me| me.id == message.author_id());
    if message.author_is_bot() || own {
        debug!(author = message.author_id(), "Ignoring message from a bot");
        return MessageOutcome {
            ignored: true,
            ..MessageOutcome::default()
        };
    }

    let kind = message.channel_kind();
    debug!(author = message.author_id(), channel = ?kind, content = message.content(), "Received message");

    let settings = app.responder();
    let mut outcome = MessageOutcome::default();

    if message.content() == settings.trigger_phrase {
        match message.send_to_channel(&settings.canned_response).await {
            Ok(()) => {
                info!(author = message.author_id(), "Sent canned reply");
                outcome.canned = true;
            }
            Err(e) => error!(error = %e, "Failed to send canned reply"),
        }
    }

    let mentioned = identity.is_some_and(|me| message.mentions(me.id));
    if !kind.is_direct() && !mentioned {
        return outcome;
    }

    // Direct messages go to the model untouched.
    let prompt = match identity {
        Some(me) if !kind.is_direct() => strip_mention(message.content(), me.id),
        _ => message.content().to_owned(),
    };

    match ask_and_post(app, message, &prompt).await {
        Ok(()) => outcome.completion = Some(true),
        Err(e) => {
            error!(author = message.author_id(), channel = ?kind, error = %e, "Failed to answer message");
            notify_failure(settings, message, kind).await;
            outcome.completion = Some(false);
        }
    }
    outcome
}

async fn ask_and_post(
    app: &AppContext,
    message: &dyn IncomingMessage,
    prompt: &str,
) -> Result<(), BoxError> {
    let answer = app
        .completion()
        .complete(&app.responder().system_prompt, prompt)
        .await?;
    message.send_to_channel(&answer).await?;
    info!(author = message.author_id(), "Posted model reply");
    Ok(())
}

async fn notify_failure(settings: &ResponderSettings, message: &dyn IncomingMessage, kind: ChannelKind) {
    let sent = match (kind, settings.failure_notice) {
        (ChannelKind::Direct, _) => message.send_to_author(&settings.fallback_notice).await,
        (ChannelKind::Guild, FailureNotice::Always) => {
            message.send_to_channel(&settings.fallback_notice).await
        }
        (ChannelKind::Guild, FailureNotice::DirectOnly) => return,
    };
    if let Err(e) = sent {
        warn!(error = %e, "Failed to deliver failure notice");
    }
}
