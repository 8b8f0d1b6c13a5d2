#![allow(dead_code)]

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use hamlet_core::{
    ApiError, ApiResult, BotIdentity, ChannelKind, Completion, CompletionError, CompletionResult,
    IncomingMessage, Interaction, Reply,
};
use hamlet_framework::{AppContext, CommandTable, ResponderSettings};
use parking_lot::Mutex;

pub const BOT_ID: u64 = 4242;

// ─── Interaction ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Reply(Reply),
    Defer(bool),
    FollowUp(Reply),
}

#[derive(Default)]
pub struct MockInteraction {
    pub name: String,
    pub replied: AtomicBool,
    pub deferred: AtomicBool,
    pub sent: Mutex<Vec<Sent>>,
}

impl MockInteraction {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Interaction for MockInteraction {
    fn command_name(&self) -> &str {
        &self.name
    }

    fn user_tag(&self) -> String {
        "yorick#0001".to_owned()
    }

    fn replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    fn deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    async fn reply(&self, reply: Reply) -> ApiResult<()> {
        if self.replied() || self.deferred() {
            return Err(ApiError::AlreadyAcknowledged);
        }
        self.replied.store(true, Ordering::SeqCst);
        self.sent.lock().push(Sent::Reply(reply));
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> ApiResult<()> {
        if self.replied() || self.deferred() {
            return Err(ApiError::AlreadyAcknowledged);
        }
        self.deferred.store(true, Ordering::SeqCst);
        self.sent.lock().push(Sent::Defer(ephemeral));
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> ApiResult<()> {
        if !self.replied() && !self.deferred() {
            return Err(ApiError::Other("nothing to follow up".into()));
        }
        self.sent.lock().push(Sent::FollowUp(reply));
        Ok(())
    }
}

// ─── Message ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Channel(String),
    Author(String),
}

pub struct MockMessage {
    pub content: String,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub kind: ChannelKind,
    pub mentioned: Vec<u64>,
    pub fail_channel: bool,
    pub deliveries: Mutex<Vec<Delivery>>,
}

impl MockMessage {
    pub fn guild(content: &str) -> Self {
        Self {
            content: content.to_owned(),
            author_id: 7,
            author_is_bot: false,
            kind: ChannelKind::Guild,
            mentioned: Vec::new(),
            fail_channel: false,
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn direct(content: &str) -> Self {
        Self {
            kind: ChannelKind::Direct,
            ..Self::guild(content)
        }
    }

    pub fn mentioning_bot(content: &str) -> Self {
        Self {
            mentioned: vec![BOT_ID],
            ..Self::guild(content)
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }
}

#[async_trait]
impl IncomingMessage for MockMessage {
    fn content(&self) -> &str {
        &self.content
    }

    fn author_id(&self) -> u64 {
        self.author_id
    }

    fn author_is_bot(&self) -> bool {
        self.author_is_bot
    }

    fn channel_kind(&self) -> ChannelKind {
        self.kind
    }

    fn mentions(&self, user_id: u64) -> bool {
        self.mentioned.contains(&user_id)
    }

    async fn send_to_channel(&self, content: &str) -> ApiResult<()> {
        if self.fail_channel {
            return Err(ApiError::Rejected("missing permissions".into()));
        }
        self.deliveries
            .lock()
            .push(Delivery::Channel(content.to_owned()));
        Ok(())
    }

    async fn send_to_author(&self, content: &str) -> ApiResult<()> {
        self.deliveries
            .lock()
            .push(Delivery::Author(content.to_owned()));
        Ok(())
    }
}

// ─── Completion ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockCompletion {
    pub fail: bool,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl MockCompletion {
    pub fn answering() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Completion for MockCompletion {
    async fn complete(&self, system: &str, prompt: &str) -> CompletionResult<String> {
        self.prompts
            .lock()
            .push((system.to_owned(), prompt.to_owned()));
        if self.fail {
            return Err(CompletionError::Status {
                status: 500,
                body: "upstream exploded".into(),
            });
        }
        Ok(format!("echo: {prompt}"))
    }
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub fn app_with(
    commands: CommandTable,
    completion: Arc<MockCompletion>,
    settings: ResponderSettings,
) -> Arc<AppContext> {
    let app = AppContext::new(commands, completion, settings);
    app.set_identity(BotIdentity {
        id: BOT_ID,
        tag: "hamlet#0420".to_owned(),
    });
    Arc::new(app)
}

pub fn app(commands: CommandTable) -> Arc<AppContext> {
    app_with(commands, MockCompletion::answering(), ResponderSettings::default())
}

// ─── Logs ─────────────────────────────────────────────────────────────────────

/// Collects formatted log lines emitted on the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes this thread's events here until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
