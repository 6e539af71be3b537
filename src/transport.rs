//! HTTP transport abstraction.
//!
//! The request adapter hands fully intercepted options to an injectable
//! transport. The default is [`ReqwestTransport`]; tests and hosts with their
//! own network primitive supply another implementation.

use crate::error::HttpError;
use crate::headers;
use crate::options::{Method, RequestOptions, UploadFileOptions};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::time::Duration;

/// Answer of the transport when a response reached the client.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network primitive behind the client.
///
/// `Err` means no response was received; any status code, including 4xx
/// and 5xx, comes back as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: RequestOptions) -> Result<TransportResponse, HttpError>;

    async fn upload(&self, request: UploadFileOptions) -> Result<TransportResponse, HttpError>;
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a `reqwest::Client` with a connect timeout and user agent.
    pub fn with_defaults(
        connect_timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder().connect_timeout(connect_timeout);
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    async fn send(rb: reqwest::RequestBuilder) -> Result<TransportResponse, HttpError> {
        let resp = rb.send().await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: RequestOptions) -> Result<TransportResponse, HttpError> {
        let header_map = headers::to_header_map(&request.header)?;
        let mut rb = self
            .client
            .request(request.method.into(), &request.url)
            .headers(header_map);
        if let Some(timeout) = request.timeout {
            rb = rb.timeout(timeout);
        }
        if let Some(data) = &request.data {
            rb = match request.method {
                Method::Get => rb.query(&query_pairs(data)),
                _ => rb.json(data),
            };
        }
        Self::send(rb).await
    }

    async fn upload(&self, request: UploadFileOptions) -> Result<TransportResponse, HttpError> {
        let bytes = tokio::fs::read(&request.file_path).await?;
        let file_name = request
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.name.clone());
        let mime = mime_guess::from_path(&request.file_path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)?;

        let mut form = reqwest::multipart::Form::new().part(request.name.clone(), part);
        for (k, v) in &request.form_data {
            form = form.text(k.clone(), v.clone());
        }

        // Multipart owns its boundary-based Content-Type.
        let mut header_map = headers::to_header_map(&request.header)?;
        header_map.remove(reqwest::header::CONTENT_TYPE);

        let mut rb = self
            .client
            .post(&request.url)
            .headers(header_map)
            .multipart(form);
        if let Some(timeout) = request.timeout {
            rb = rb.timeout(timeout);
        }
        Self::send(rb).await
    }
}

/// Flatten a JSON object into query pairs; scalars are written bare and
/// nested values as JSON text.
fn query_pairs(data: &serde_json::Value) -> Vec<(String, String)> {
    match data {
        serde_json::Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let v = match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), v)
            })
            .collect(),
        _ => Vec::new(),
    }
}
