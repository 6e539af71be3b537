//! Default values shared by the client, the interceptor and the adapter.

/// HTTP defaults
pub mod http {
    use std::time::Duration;

    /// Backend that relative paths are resolved against.
    pub const BASE_URL: &str = "https://pcapi-xiaotuxian-front-devtest.itheima.net";

    /// Timeout stamped on every intercepted call.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Client identification header.
    pub const SOURCE_CLIENT_HEADER: &str = "source-client";
    pub const SOURCE_CLIENT: &str = "miniapp";

    /// Header carrying the raw session token.
    pub const AUTHORIZATION_HEADER: &str = "Authorization";

    pub const USER_AGENT: &str = concat!("miniapp-http/", env!("CARGO_PKG_VERSION"));

    /// Scheme prefix that marks a URL as already absolute.
    pub const ABSOLUTE_URL_PREFIX: &str = "http";
}

/// UI defaults
pub mod ui {
    /// Page the user is sent to when the backend answers 401.
    pub const LOGIN_URL: &str = "/pages/login/login";

    /// Toast shown when no response reached the client.
    pub const NETWORK_ERROR_MESSAGE: &str = "网络错误";

    /// Toast shown for other failures when the backend gave no message.
    pub const FALLBACK_ERROR_MESSAGE: &str = "请求错误";
}

/// Environment variables read by `ClientConfig::from_env`.
pub mod env {
    pub const BASE_URL: &str = "MINIAPP_HTTP_BASE_URL";
    pub const TIMEOUT_MS: &str = "MINIAPP_HTTP_TIMEOUT_MS";
}
