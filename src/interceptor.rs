//! HTTP Interceptor interfaces
//!
//! Interceptors mutate the options of an outgoing call before the transport
//! sees them, and may observe the status or error afterwards. They are
//! registered per [`CallKind`] on an [`InterceptorRegistry`] owned by the
//! client, so several differently configured clients can coexist.

use crate::config::ClientConfig;
use crate::defaults;
use crate::error::HttpError;
use crate::headers;
use crate::options::{CallKind, InterceptableOptions};
use crate::session::SessionStore;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Context passed to the observation hooks.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    /// Unique per call, shared by all hooks of that call
    pub request_id: String,
    pub kind: CallKind,
    /// Final URL after interception
    pub url: String,
}

/// Generate a request id for [`HttpRequestContext`].
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before dispatch. Mutates the options in place and cannot fail.
    fn invoke(&self, kind: CallKind, options: &mut dyn InterceptableOptions);

    /// Called when a response arrived, whatever its status.
    fn on_response(&self, _ctx: &HttpRequestContext, _status: u16) {}

    /// Called when the call settles with an error.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &HttpError) {}
}

/// The shop backend interceptor: absolute URL, fixed timeout, client header
/// and session token.
pub struct MiniappInterceptor {
    base_url: String,
    timeout: Duration,
    source_client: String,
    session: Arc<dyn SessionStore>,
}

impl MiniappInterceptor {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            source_client: config.source_client.clone(),
            session,
        }
    }
}

impl HttpInterceptor for MiniappInterceptor {
    fn invoke(&self, _kind: CallKind, options: &mut dyn InterceptableOptions) {
        if !options.url().starts_with(defaults::http::ABSOLUTE_URL_PREFIX) {
            let url = format!("{}{}", self.base_url, options.url());
            options.set_url(url);
        }

        options.set_timeout(self.timeout);

        let mut fixed = HashMap::from([(
            defaults::http::SOURCE_CLIENT_HEADER.to_string(),
            self.source_client.clone(),
        )]);
        if let Some(token) = self.session.token() {
            let token = token.expose_secret();
            if !token.is_empty() {
                fixed.insert(
                    defaults::http::AUTHORIZATION_HEADER.to_string(),
                    token.to_string(),
                );
            }
        }
        headers::merge_headers(options.header_mut(), &fixed);
    }
}

/// A simple logging interceptor backed by `tracing` (token redacted).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn invoke(&self, kind: CallKind, options: &mut dyn InterceptableOptions) {
        tracing::debug!(
            target: "miniapp_http::http",
            kind = kind.as_str(),
            url = %options.url(),
            timeout_ms = options.timeout().map(|t| t.as_millis() as u64),
            header = ?headers::redacted(options.header()),
            "options"
        );
    }

    fn on_response(&self, ctx: &HttpRequestContext, status: u16) {
        tracing::debug!(target: "miniapp_http::http", request_id=%ctx.request_id, url=%ctx.url, status, "response received");
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &HttpError) {
        tracing::debug!(target: "miniapp_http::http", request_id=%ctx.request_id, url=%ctx.url, err=%error, "request error");
    }
}

/// Interceptors per call kind, in registration order.
#[derive(Clone, Default)]
pub struct InterceptorRegistry {
    entries: HashMap<CallKind, Vec<Arc<dyn HttpInterceptor>>>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `interceptor` for `kind`.
    pub fn add(&mut self, kind: CallKind, interceptor: Arc<dyn HttpInterceptor>) {
        self.entries.entry(kind).or_default().push(interceptor);
    }

    /// Register `interceptor` for every call kind.
    pub fn add_all(&mut self, interceptor: Arc<dyn HttpInterceptor>) {
        self.add(CallKind::Request, interceptor.clone());
        self.add(CallKind::UploadFile, interceptor);
    }

    pub fn interceptors(&self, kind: CallKind) -> &[Arc<dyn HttpInterceptor>] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Run every interceptor of `kind` over `options`.
    pub fn apply(&self, kind: CallKind, options: &mut dyn InterceptableOptions) {
        for it in self.interceptors(kind) {
            it.invoke(kind, options);
        }
    }

    pub(crate) fn notify_response(&self, ctx: &HttpRequestContext, status: u16) {
        for it in self.interceptors(ctx.kind) {
            it.on_response(ctx, status);
        }
    }

    pub(crate) fn notify_error(&self, ctx: &HttpRequestContext, error: &HttpError) {
        for it in self.interceptors(ctx.kind) {
            it.on_error(ctx, error);
        }
    }
}
