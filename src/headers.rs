//! Header map utilities.
//!
//! Options carry headers as a plain `HashMap<String, String>` so interceptors
//! can edit them freely; the transport converts them here.

use crate::defaults;
use crate::error::HttpError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// Convert option headers into a `HeaderMap`, rejecting invalid names or
/// values instead of dropping them.
pub fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, HttpError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| HttpError::InvalidHeader(format!("Invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| HttpError::InvalidHeader(format!("Invalid value for '{key}': {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Merge `extra` into `base`; `extra` wins on equal names (case-insensitive).
pub fn merge_headers(base: &mut HashMap<String, String>, extra: &HashMap<String, String>) {
    for (k, v) in extra {
        base.retain(|existing, _| !existing.eq_ignore_ascii_case(k));
        base.insert(k.clone(), v.clone());
    }
}

/// Copy of `headers` safe to log.
pub fn redacted(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| {
            if k.eq_ignore_ascii_case(defaults::http::AUTHORIZATION_HEADER) {
                (k.clone(), "<redacted>".to_string())
            } else {
                (k.clone(), v.clone())
            }
        })
        .collect()
}
