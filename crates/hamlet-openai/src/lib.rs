//! OpenAI-compatible chat completion client.
//!
//! [`OpenAiClient`] implements [`hamlet_core::Completion`] against any
//! endpoint that speaks the OpenAI chat completion format. Each call sends a
//! system message and one user message and returns the first choice's text.
//!
//! ```rust,ignore
//! use hamlet_openai::{OpenAiClient, OpenAiSettings};
//!
//! let client = OpenAiClient::new(api_key, OpenAiSettings::default())?;
//! let answer = client.complete("You are a helpful assistant.", "Who's there?").await?;
//! ```

mod client;
mod error;
mod types;

pub use client::{OpenAiClient, OpenAiSettings};
pub use error::{OpenAiError, OpenAiResult};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, ResponseMessage};
