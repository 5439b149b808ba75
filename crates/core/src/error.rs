//! Unified error types for mcp-kagi.
//!
//! Each variant maps to a stable MCP error code.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the mcp-kagi server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No API key available.
    #[error("MISSING_CREDENTIAL: {0}")]
    MissingCredential(String),

    /// Upstream returned a non-success status.
    #[error("REQUEST_FAILED: status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Upstream returned a success status with a body that is not JSON.
    #[error("MALFORMED_RESPONSE: {0}")]
    MalformedResponse(String),

    /// Request timeout.
    #[error("TIMEOUT: {0}")]
    Timeout(String),

    /// Transport-level failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Configuration could not be loaded or is invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(String),
}

impl From<crate::ConfigError> for Error {
    fn from(err: crate::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::MissingCredential(msg) => (-32009, msg.clone()),
            Error::RequestFailed { status, body } => {
                (-32008, format!("Kagi API request failed with status {}: {}", status, body))
            }
            Error::MalformedResponse(msg) => (-32013, msg.clone()),
            Error::Timeout(msg) => (-32006, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::Config(msg) => (-32603, msg.clone()),
        };

        let data = match &err {
            Error::RequestFailed { status, body } => Some(serde_json::json!({ "status": status, "body": body })),
            _ => None,
        };

        McpError { code: ErrorCode(code), message: message.into(), data }
    }
}
