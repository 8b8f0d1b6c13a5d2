//! Language-model collaborator interface.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CompletionResult;

/// Generates a reply for a piece of user text.
#[async_trait]
pub trait Completion: Send + Sync + 'static {
    /// Returns generated text for `prompt`, steered by the `system` instruction.
    async fn complete(&self, system: &str, prompt: &str) -> CompletionResult<String>;
}

/// A shared completion trait object.
pub type BoxedCompletion = Arc<dyn Completion>;
