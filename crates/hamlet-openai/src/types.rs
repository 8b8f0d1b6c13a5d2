//! Wire types for `POST /chat/completions`.

use serde::{Deserialize, Serialize};

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// The part of the response body the client reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Absent when the model answered with tool calls only.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if it has any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_skips_blank_and_missing() {
        let parse = |v: serde_json::Value| serde_json::from_value::<ChatResponse>(v).unwrap();

        let answered = parse(serde_json::json!({
            "model": "gpt-3.5-turbo",
            "choices": [{"message": {"role": "assistant", "content": "Ay, my lord."}}]
        }));
        assert_eq!(answered.first_text(), Some("Ay, my lord."));

        let blank = parse(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  "}}]
        }));
        assert_eq!(blank.first_text(), None);

        let tool_only = parse(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "tool_calls": []}}]
        }));
        assert_eq!(tool_only.first_text(), None);

        assert_eq!(parse(serde_json::json!({"choices": []})).first_text(), None);
    }
}
