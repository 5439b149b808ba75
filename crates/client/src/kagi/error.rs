//! Kagi API client error types.

use std::sync::Arc;

/// Errors from the Kagi Search API client.
#[derive(Debug, thiserror::Error)]
pub enum KagiError {
    /// Request input failed validation. No request was sent.
    #[error("invalid request: {0}")]
    Validation(String),

    /// No API key could be resolved from the override or the environment.
    #[error("missing API key: {var} not set")]
    MissingCredential { var: String },

    /// Kagi answered with a non-success status.
    #[error("Kagi API request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Kagi answered with a success status but the body was not JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Base URL could not be turned into a search endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),
}

impl From<reqwest::Error> for KagiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { KagiError::Timeout } else { KagiError::Network(Arc::new(err)) }
    }
}

impl KagiError {
    /// Whether the error was raised before any network I/O took place.
    pub fn is_local(&self) -> bool {
        matches!(self, KagiError::Validation(_) | KagiError::MissingCredential { .. })
    }
}
