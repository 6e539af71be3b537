//! Core error types.

use thiserror::Error;

/// Coarse classification of a failure that happened before any response
/// reached the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The per-request timeout elapsed.
    Timeout,
    /// DNS resolution or TCP/TLS connect failed.
    Connect,
    /// The request could not be built or sent.
    Request,
    Other,
}

/// Errors returned by [`crate::RequestClient`].
#[derive(Error, Debug, Clone)]
pub enum HttpError {
    /// The backend answered 401. The session has been cleared and the user
    /// sent to the login page before this is returned.
    #[error("Unauthorized ({status})")]
    Unauthorized { status: u16, body: String },

    /// No response reached the client.
    #[error("Network error ({kind:?}): {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// Any other non-2xx answer.
    #[error("HTTP {status}: {}", .msg.as_deref().unwrap_or("request failed"))]
    Status {
        status: u16,
        /// Backend `code` when the body was an envelope.
        code: Option<String>,
        /// Backend `msg` when the body was an envelope.
        msg: Option<String>,
        body: String,
    },

    /// A 2xx body that is not a valid envelope for the requested type.
    #[error("Failed to decode response envelope: {0}")]
    Decode(String),

    /// The outgoing query or body could not be turned into JSON.
    #[error("Failed to serialize request data: {0}")]
    Serialize(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Reading the file of an upload failed.
    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl HttpError {
    /// HTTP status carried by the error, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// True when the call never got a response.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Message suitable for a toast, when the error carries one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Status { msg, .. } => msg.as_deref(),
            _ => None,
        }
    }
}

/// Result type for miniapp-http operations
pub type Result<T> = std::result::Result<T, HttpError>;
