//! Request client
//!
//! `RequestClient` is the composition root: it owns the interceptor registry,
//! the transport and the host collaborators, and exposes the request adapter
//! that turns a transport answer into `Result<Envelope<T>, HttpError>`.
//!
//! Outcome of a call:
//! - 2xx: the body is decoded as `Envelope<T>`
//! - 401: the session profile is cleared, the login page opened, and
//!   `HttpError::Unauthorized` returned
//! - no response: a network toast is shown and `HttpError::Transport` returned
//! - any other status: the backend `msg` (or a fallback) is toasted and
//!   `HttpError::Status` returned

use crate::config::ClientConfig;
use crate::envelope::{Envelope, ErrorEnvelope};
use crate::error::HttpError;
use crate::interceptor::{
    HttpInterceptor, HttpRequestContext, InterceptorRegistry, LoggingInterceptor,
    MiniappInterceptor, generate_request_id,
};
use crate::options::{CallKind, RequestOptions, UploadFileOptions, UploadFileResponse};
use crate::platform::{Navigator, Notifier, Toast, TracingNavigator, TracingNotifier};
use crate::session::{NoSession, SessionStore};
use crate::transport::{HttpTransport, ReqwestTransport, TransportResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Configured client for the shop backend.
#[derive(Clone)]
pub struct RequestClient {
    config: Arc<ClientConfig>,
    registry: Arc<InterceptorRegistry>,
    transport: Arc<dyn HttpTransport>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

static_assertions::assert_impl_all!(RequestClient: Send, Sync, Clone);

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    pub fn builder() -> RequestClientBuilder {
        RequestClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn interceptors(&self) -> &InterceptorRegistry {
        &self.registry
    }

    /// Send a request and unwrap the response envelope.
    pub async fn http<T>(&self, mut options: RequestOptions) -> Result<Envelope<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        self.registry.apply(CallKind::Request, &mut options);
        let ctx = HttpRequestContext {
            request_id: generate_request_id(),
            kind: CallKind::Request,
            url: options.url.clone(),
        };

        let outcome = self.transport.execute(options).await;
        let result = self.settle(&ctx, outcome);
        if let Err(e) = &result {
            self.registry.notify_error(&ctx, e);
        }
        result
    }

    pub async fn get<T>(&self, url: impl Into<String>) -> Result<Envelope<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        self.http(RequestOptions::get(url)).await
    }

    /// GET with `query` serialized into the query string.
    pub async fn get_with_query<T, Q>(
        &self,
        url: impl Into<String>,
        query: &Q,
    ) -> Result<Envelope<T>, HttpError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let data = request_data(query)?;
        self.http(RequestOptions::get(url).with_data(data)).await
    }

    pub async fn post<T, B>(&self, url: impl Into<String>, body: &B) -> Result<Envelope<T>, HttpError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let data = request_data(body)?;
        self.http(RequestOptions::post(url).with_data(data)).await
    }

    pub async fn put<T, B>(&self, url: impl Into<String>, body: &B) -> Result<Envelope<T>, HttpError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let data = request_data(body)?;
        self.http(RequestOptions::put(url).with_data(data)).await
    }

    pub async fn delete<T>(&self, url: impl Into<String>) -> Result<Envelope<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        self.http(RequestOptions::delete(url)).await
    }

    /// Upload a file through the `UploadFile` interceptors.
    ///
    /// The body is returned as text without envelope handling; callers
    /// decode it themselves.
    pub async fn upload_file(
        &self,
        mut options: UploadFileOptions,
    ) -> Result<UploadFileResponse, HttpError> {
        self.registry.apply(CallKind::UploadFile, &mut options);
        let ctx = HttpRequestContext {
            request_id: generate_request_id(),
            kind: CallKind::UploadFile,
            url: options.url.clone(),
        };

        match self.transport.upload(options).await {
            Ok(resp) => {
                self.registry.notify_response(&ctx, resp.status);
                Ok(UploadFileResponse {
                    status_code: resp.status,
                    data: resp.text(),
                })
            }
            Err(e) => {
                self.registry.notify_error(&ctx, &e);
                Err(e)
            }
        }
    }

    fn settle<T>(
        &self,
        ctx: &HttpRequestContext,
        outcome: Result<TransportResponse, HttpError>,
    ) -> Result<Envelope<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        let resp = match outcome {
            Ok(resp) => resp,
            Err(err) => {
                if err.is_network() {
                    tracing::warn!(target: "miniapp_http::http", request_id=%ctx.request_id, url=%ctx.url, err=%err, "network error");
                    self.notifier
                        .show_toast(&Toast::text(self.config.network_error_message.clone()));
                }
                return Err(err);
            }
        };

        self.registry.notify_response(ctx, resp.status);

        match resp.status {
            200..=299 => Envelope::from_slice(&resp.body).map_err(|e| {
                tracing::warn!(target: "miniapp_http::http", request_id=%ctx.request_id, url=%ctx.url, err=%e, "invalid envelope");
                HttpError::Decode(e.to_string())
            }),
            401 => {
                tracing::warn!(target: "miniapp_http::http", request_id=%ctx.request_id, url=%ctx.url, "unauthorized, redirecting to login");
                self.session.clear_profile();
                self.navigator.navigate_to(&self.config.login_url);
                Err(HttpError::Unauthorized {
                    status: resp.status,
                    body: resp.text(),
                })
            }
            status => {
                let ErrorEnvelope { code, msg } = ErrorEnvelope::parse(&resp.body);
                let title = msg
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(self.config.fallback_error_message.as_str());
                self.notifier.show_toast(&Toast::text(title));
                Err(HttpError::Status {
                    status,
                    code,
                    msg,
                    body: resp.text(),
                })
            }
        }
    }
}

fn request_data<B: Serialize + ?Sized>(data: &B) -> Result<serde_json::Value, HttpError> {
    serde_json::to_value(data).map_err(|e| HttpError::Serialize(e.to_string()))
}

/// Builder for [`RequestClient`].
///
/// Unset collaborators default to an anonymous session, a reqwest transport
/// and log-only navigation/toasts.
#[derive(Default)]
pub struct RequestClientBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    session: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    notifier: Option<Arc<dyn Notifier>>,
    extra: Vec<(Option<CallKind>, Arc<dyn HttpInterceptor>)>,
}

impl RequestClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Add an interceptor for one call kind, run after the built-in ones.
    pub fn interceptor(mut self, kind: CallKind, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.extra.push((Some(kind), interceptor));
        self
    }

    /// Add an interceptor for every call kind, run after the built-in ones.
    pub fn interceptor_all(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.extra.push((None, interceptor));
        self
    }

    pub fn build(self) -> Result<RequestClient, HttpError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::with_defaults(
                config.connect_timeout,
                config.user_agent.as_deref(),
            )?),
        };
        let session = self.session.unwrap_or_else(|| Arc::new(NoSession));

        let mut registry = InterceptorRegistry::new();
        registry.add_all(Arc::new(MiniappInterceptor::new(&config, session.clone())));
        if config.log_options {
            registry.add_all(Arc::new(LoggingInterceptor));
        }
        for (kind, it) in self.extra {
            match kind {
                Some(kind) => registry.add(kind, it),
                None => registry.add_all(it),
            }
        }

        Ok(RequestClient {
            config: Arc::new(config),
            registry: Arc::new(registry),
            transport,
            session,
            navigator: self
                .navigator
                .unwrap_or_else(|| Arc::new(TracingNavigator)),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::error::TransportErrorKind;
    use crate::options::InterceptableOptions;
    use crate::session::{MemberProfile, MemorySession};
    use async_trait::async_trait;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Transport answering every call with one scripted outcome and keeping
    /// the options it was given.
    struct ScriptedTransport {
        outcome: Result<(u16, String), TransportErrorKind>,
        seen: Mutex<Vec<RequestOptions>>,
    }

    impl ScriptedTransport {
        fn status(status: u16, body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok((status, body.to_string())),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(kind: TransportErrorKind) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(kind),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> RequestOptions {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(&self, request: RequestOptions) -> Result<TransportResponse, HttpError> {
            self.seen.lock().unwrap().push(request);
            match &self.outcome {
                Ok((status, body)) => Ok(TransportResponse {
                    status: *status,
                    headers: HeaderMap::new(),
                    body: body.clone().into_bytes(),
                }),
                Err(kind) => Err(HttpError::Transport {
                    kind: *kind,
                    message: "simulated".into(),
                }),
            }
        }

        async fn upload(&self, _request: UploadFileOptions) -> Result<TransportResponse, HttpError> {
            unreachable!("not used by these tests")
        }
    }

    #[derive(Default)]
    struct Recorder {
        navigations: Mutex<Vec<String>>,
        toasts: Mutex<Vec<Toast>>,
    }

    impl Navigator for Recorder {
        fn navigate_to(&self, url: &str) {
            self.navigations.lock().unwrap().push(url.to_string());
        }
    }

    impl Notifier for Recorder {
        fn show_toast(&self, toast: &Toast) {
            self.toasts.lock().unwrap().push(toast.clone());
        }
    }

    fn client(
        transport: Arc<ScriptedTransport>,
        session: Arc<dyn SessionStore>,
        recorder: Arc<Recorder>,
    ) -> RequestClient {
        RequestClient::builder()
            .transport(transport)
            .session(session)
            .navigator(recorder.clone())
            .notifier(recorder)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn success_resolves_with_exact_envelope() {
        let transport = ScriptedTransport::status(200, json!({"code":"0","msg":"ok","result":{"x":1}}));
        let recorder = Arc::new(Recorder::default());
        let c = client(transport, Arc::new(NoSession), recorder.clone());

        let env: Envelope<serde_json::Value> = c.get("/home/banner").await.unwrap();
        assert_eq!(
            env,
            Envelope {
                code: "0".into(),
                msg: "ok".into(),
                result: json!({"x": 1}),
            }
        );
        assert!(recorder.toasts.lock().unwrap().is_empty());
        assert!(recorder.navigations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatched_options_are_intercepted() {
        let transport = ScriptedTransport::status(204, json!({"code":"0","msg":"","result":null}));
        let session = Arc::new(MemorySession::with_profile(MemberProfile::with_token("abc")));
        let c = client(transport.clone(), session, Arc::new(Recorder::default()));

        let _: Envelope<()> = c
            .http(RequestOptions::get("/member/profile").with_timeout(Duration::from_secs(99)))
            .await
            .unwrap();

        let sent = transport.last();
        assert_eq!(sent.url, format!("{}/member/profile", defaults::http::BASE_URL));
        assert_eq!(sent.timeout, Some(Duration::from_millis(10_000)));
        assert_eq!(sent.header["source-client"], "miniapp");
        assert_eq!(sent.header["Authorization"], "abc");
    }

    #[tokio::test]
    async fn anonymous_call_has_no_authorization() {
        let transport = ScriptedTransport::status(200, json!({"code":"0","msg":"ok","result":[]}));
        let c = client(transport.clone(), Arc::new(NoSession), Arc::new(Recorder::default()));

        let _: Envelope<Vec<u8>> = c.get("https://other.example/list").await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.url, "https://other.example/list");
        assert!(!sent.header().keys().any(|k| k.eq_ignore_ascii_case("authorization")));
    }

    #[tokio::test]
    async fn unauthorized_clears_session_and_navigates_once() {
        let transport = ScriptedTransport::status(401, json!({"code":"401","msg":"token失效"}));
        let session = Arc::new(MemorySession::with_profile(MemberProfile::with_token("stale")));
        let recorder = Arc::new(Recorder::default());
        let c = client(transport, session.clone(), recorder.clone());

        let err = c.get::<serde_json::Value>("/member/order").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(
            *recorder.navigations.lock().unwrap(),
            vec!["/pages/login/login".to_string()]
        );
        assert!(recorder.toasts.lock().unwrap().is_empty());
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn transport_failure_shows_one_network_toast() {
        let transport = ScriptedTransport::failing(TransportErrorKind::Timeout);
        let recorder = Arc::new(Recorder::default());
        let c = client(transport, Arc::new(NoSession), recorder.clone());

        let err = c.get::<serde_json::Value>("/home/banner").await.unwrap_err();
        assert!(matches!(
            err,
            HttpError::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        ));
        assert_eq!(
            *recorder.toasts.lock().unwrap(),
            vec![Toast::text("网络错误")]
        );
        assert!(recorder.navigations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_error_rejects_with_backend_message() {
        let transport = ScriptedTransport::status(500, json!({"code":"500","msg":"服务器繁忙"}));
        let recorder = Arc::new(Recorder::default());
        let c = client(transport, Arc::new(NoSession), recorder.clone());

        let err = c.get::<serde_json::Value>("/goods").await.unwrap_err();
        match &err {
            HttpError::Status {
                status, code, msg, ..
            } => {
                assert_eq!(*status, 500);
                assert_eq!(code.as_deref(), Some("500"));
                assert_eq!(msg.as_deref(), Some("服务器繁忙"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
        assert_eq!(
            *recorder.toasts.lock().unwrap(),
            vec![Toast::text("服务器繁忙")]
        );
        assert!(recorder.navigations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_without_message_uses_fallback_toast() {
        let transport = ScriptedTransport::status(404, json!("not found"));
        let recorder = Arc::new(Recorder::default());
        let c = client(transport, Arc::new(NoSession), recorder.clone());

        let err = c.get::<serde_json::Value>("/missing").await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(*recorder.toasts.lock().unwrap(), vec![Toast::text("请求错误")]);
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let transport = ScriptedTransport::status(200, json!({"unexpected": true}));
        let recorder = Arc::new(Recorder::default());
        let c = client(transport, Arc::new(NoSession), recorder.clone());

        let err = c.get::<serde_json::Value>("/x").await.unwrap_err();
        assert!(matches!(err, HttpError::Decode(_)));
        assert!(recorder.toasts.lock().unwrap().is_empty());
    }

    struct ErrorFlag(Arc<Mutex<Vec<u16>>>);

    impl HttpInterceptor for ErrorFlag {
        fn invoke(&self, _kind: CallKind, _options: &mut dyn InterceptableOptions) {}
        fn on_error(&self, _ctx: &HttpRequestContext, error: &HttpError) {
            self.0.lock().unwrap().push(error.status_code().unwrap_or(0));
        }
    }

    #[tokio::test]
    async fn extra_interceptor_is_notified_of_errors() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let c = RequestClient::builder()
            .transport(ScriptedTransport::status(401, json!({})))
            .navigator(Arc::new(Recorder::default()))
            .interceptor(CallKind::Request, Arc::new(ErrorFlag(seen.clone())))
            .build()
            .unwrap();

        let _ = c.get::<serde_json::Value>("/x").await;
        assert_eq!(*seen.lock().unwrap(), vec![401]);
    }

    #[tokio::test]
    async fn post_serializes_body_into_options() {
        let transport = ScriptedTransport::status(200, json!({"code":"1","msg":"ok","result":"id-9"}));
        let c = client(transport.clone(), Arc::new(NoSession), Arc::new(Recorder::default()));

        let env: Envelope<String> = c
            .post("/member/address", &json!({"receiver": "张三"}))
            .await
            .unwrap();
        assert_eq!(env.result, "id-9");
        let sent = transport.last();
        assert_eq!(sent.method, crate::options::Method::Post);
        assert_eq!(sent.data, Some(json!({"receiver": "张三"})));
    }

    #[tokio::test]
    async fn numeric_backend_code_still_toasts_message() {
        let transport = ScriptedTransport::status(400, json!({"code": 10001, "msg": "参数错误"}));
        let recorder = Arc::new(Recorder::default());
        let c = client(transport, Arc::new(NoSession), recorder.clone());

        let err = c.get::<serde_json::Value>("/member/address").await.unwrap_err();
        match &err {
            HttpError::Status { code, msg, .. } => {
                assert_eq!(code.as_deref(), Some("10001"));
                assert_eq!(msg.as_deref(), Some("参数错误"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
        assert_eq!(*recorder.toasts.lock().unwrap(), vec![Toast::text("参数错误")]);
    }

    #[tokio::test]
    async fn unserializable_body_fails_before_dispatch() {
        let transport = ScriptedTransport::status(200, json!({"code":"1","msg":"ok","result":null}));
        let recorder = Arc::new(Recorder::default());
        let c = client(transport.clone(), Arc::new(NoSession), recorder.clone());

        // JSON object keys must be strings.
        let body = std::collections::HashMap::from([((1, 2), "cell")]);
        let err = c.post::<(), _>("/member/cart", &body).await.unwrap_err();

        assert!(matches!(err, HttpError::Serialize(_)));
        assert!(err.to_string().starts_with("Failed to serialize request data"));
        assert!(transport.seen.lock().unwrap().is_empty());
        assert!(recorder.toasts.lock().unwrap().is_empty());
    }

    #[test]
    fn build_rejects_relative_base_url() {
        let err = RequestClient::builder()
            .config(ClientConfig::builder().base_url("/api").build())
            .transport(ScriptedTransport::status(200, json!({})))
            .build()
            .unwrap_err();
        assert!(matches!(err, HttpError::Configuration(_)));
    }
}
