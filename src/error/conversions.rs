//! Type Conversions for HttpError
//!
//! From implementations for the error types produced by the transport and
//! the envelope decoder.

use super::types::{HttpError, TransportErrorKind};

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_request() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };
        Self::Transport {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
