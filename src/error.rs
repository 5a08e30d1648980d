//! Eldhrimnir error types

use std::time::Duration;

/// Eldhrimnir error types
#[derive(Debug, thiserror::Error)]
pub enum EldhrimnirError {
    // Upstream transport/status errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response from provider")]
    EmptyResponse,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    /// No credential configured for a source. Callers that treat this as a
    /// degraded mode never surface it to the end user.
    #[error("{0} source not configured")]
    NotConfigured(&'static str),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Orchestration errors
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("task failed: {0}")]
    Task(String),

    /// Both the generative and the recipe-search source failed for a request.
    #[error("no recipe sources are currently available")]
    NoSourcesAvailable,
}

impl EldhrimnirError {
    /// Whether this error came from talking to an upstream provider
    /// (transport, status, or body parsing).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            EldhrimnirError::Http(_)
                | EldhrimnirError::Api { .. }
                | EldhrimnirError::RateLimited { .. }
                | EldhrimnirError::AuthenticationFailed
                | EldhrimnirError::Json(_)
                | EldhrimnirError::EmptyResponse
        )
    }
}

/// Result type alias for Eldhrimnir operations
pub type Result<T> = std::result::Result<T, EldhrimnirError>;
