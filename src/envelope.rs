//! Standard response envelope of the shop backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `{ code, msg, result }` payload returned on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    pub msg: String,
    pub result: T,
}

impl<T> Envelope<T> {
    /// Consume the envelope, keeping only the payload.
    pub fn into_result(self) -> T {
        self.result
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// `code`/`msg` of an error body, when it happens to be an envelope.
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorEnvelope {
    pub code: Option<String>,
    pub msg: Option<String>,
}

// Error bodies are not always well-typed; `code` may be a string or a number.
#[derive(Deserialize)]
struct RawErrorEnvelope {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    msg: Option<serde_json::Value>,
}

fn scalar_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl ErrorEnvelope {
    pub(crate) fn parse(body: &[u8]) -> Self {
        match serde_json::from_slice::<RawErrorEnvelope>(body) {
            Ok(raw) => Self {
                code: raw.code.and_then(scalar_to_string),
                msg: raw.msg.and_then(scalar_to_string),
            },
            Err(_) => Self::default(),
        }
    }
}
