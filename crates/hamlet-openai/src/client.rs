use std::time::Duration;

use async_trait::async_trait;
use hamlet_core::{Completion, CompletionResult};
use tracing::{debug, warn};

use crate::error::{OpenAiError, OpenAiResult};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

/// Endpoint and model selection.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-3.5-turbo".into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// A chat completion client for OpenAI-compatible APIs.
pub struct OpenAiClient {
    settings: OpenAiSettings,
    http: reqwest::Client,
    api_key: String,
}

impl OpenAiClient {
    /// Creates a client that authenticates with `api_key`.
    pub fn new(api_key: impl Into<String>, settings: OpenAiSettings) -> OpenAiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            settings,
            http,
            api_key: api_key.into(),
        })
    }

    pub fn settings(&self) -> &OpenAiSettings {
        &self.settings
    }

    fn completions_url(&self) -> String {
        let base = self.settings.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Sends one chat request and returns the parsed body.
    pub async fn chat(&self, request: &ChatRequest) -> OpenAiResult<ChatResponse> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat completion rejected");
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        debug!(model = %chat.model, choices = chat.choices.len(), "chat completion received");
        Ok(chat)
    }

    /// Asks the model to answer `prompt` under the `system` instruction.
    pub async fn ask(&self, system: &str, prompt: &str) -> OpenAiResult<String> {
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
        };
        let response = self.chat(&request).await?;
        response
            .first_text()
            .map(str::to_owned)
            .ok_or(OpenAiError::EmptyResponse)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Completion for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> CompletionResult<String> {
        Ok(self.ask(system, prompt).await?)
    }
}
