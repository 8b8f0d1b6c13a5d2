//! Unified error types for the Hamlet collaborator interfaces.
//!
//! Registry and dispatch errors live in `hamlet-framework`; the types here
//! describe failures reported by the external collaborators (messaging
//! platform and language model).

use thiserror::Error;

/// Type-erased error returned by command and event handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// API Errors
// =============================================================================

/// Error type for calls made against the messaging platform (reply, send, …).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The platform session is not connected.
    #[error("platform is not connected")]
    NotConnected,

    /// The interaction already received its initial response.
    #[error("interaction already acknowledged")]
    AlreadyAcknowledged,

    /// The platform rejected the request.
    #[error("platform API error: {0}")]
    Rejected(String),

    /// The call did not complete in time.
    #[error("platform call timed out")]
    Timeout,

    /// Other error.
    #[error("{0}")]
    Other(String),
}

// =============================================================================
// Platform Errors
// =============================================================================

/// Errors raised while establishing or running the platform session.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// Logging in with the supplied token failed.
    #[error("login failed: {0}")]
    Login(String),

    /// The gateway session ended with an error.
    #[error("gateway error: {0}")]
    Gateway(String),

    /// The runtime stopped listening for events.
    #[error("event sink closed")]
    SinkClosed,
}

// =============================================================================
// Completion Errors
// =============================================================================

/// Errors reported by the language-model collaborator.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// The request could not be delivered.
    #[error("completion request failed: {0}")]
    Request(String),

    /// The upstream service answered with an error status.
    #[error("completion service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The response carried no generated text.
    #[error("completion response contained no text")]
    EmptyResponse,

    /// The call did not complete in time.
    #[error("completion request timed out")]
    Timeout,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for platform API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for platform session operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Result type for language-model calls.
pub type CompletionResult<T> = Result<T, CompletionError>;
