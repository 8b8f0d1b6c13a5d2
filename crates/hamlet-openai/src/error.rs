use hamlet_core::CompletionError;
use thiserror::Error;

/// Failures talking to the completion endpoint.
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response has no message content")]
    EmptyResponse,
}

pub type OpenAiResult<T> = Result<T, OpenAiError>;

impl From<OpenAiError> for CompletionError {
    fn from(err: OpenAiError) -> Self {
        match err {
            OpenAiError::Http(e) if e.is_timeout() => CompletionError::Timeout,
            OpenAiError::Http(e) => CompletionError::Request(e.to_string()),
            OpenAiError::Status { status, body } => CompletionError::Status { status, body },
            OpenAiError::EmptyResponse => CompletionError::EmptyResponse,
        }
    }
}
