//! Client error types.

use thiserror::Error;

/// Errors surfaced by the request dispatcher.
///
/// Transport failures, HTTP-level failures and decode failures stay
/// distinct so callers can tell a dead connection from a server that
/// answered with an error status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or TLS failure before a response was read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("HTTP error: {status}")]
    Http {
        /// Status line of the failed response, e.g. "404 Not Found".
        status: String,
    },

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML encode or decode failed.
    #[error("XML error: {0}")]
    Xml(String),
}

impl ApiError {
    /// Check if this is an HTTP-level (non-2xx) error.
    pub fn is_http(&self) -> bool {
        matches!(self, ApiError::Http { .. })
    }

    /// Check if this is a transport-level error.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
