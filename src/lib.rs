//! miniapp-http
//!
//! Request wrapper for the shop mini-app backend. A [`RequestClient`] runs
//! every call through its interceptors (absolute URL, fixed timeout, client
//! header, session token), dispatches it on an [`HttpTransport`], and turns
//! the answer into `Result<Envelope<T>, HttpError>`, opening the login page
//! on 401 and toasting on failures.
//!
//! ```rust,ignore
//! use miniapp_http::prelude::*;
//! use std::sync::Arc;
//!
//! let session = Arc::new(MemorySession::new());
//! let client = RequestClient::builder().session(session).build()?;
//! let banners: Envelope<Vec<serde_json::Value>> = client.get("/home/banner").await?;
//! ```
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod defaults;
pub mod envelope;
pub mod error;
pub mod headers;
pub mod interceptor;
pub mod options;
pub mod platform;
pub mod session;
pub mod transport;

pub use client::{RequestClient, RequestClientBuilder};
pub use config::ClientConfig;
pub use envelope::Envelope;
pub use error::HttpError;

/// Commonly used types
pub mod prelude {
    pub use crate::client::{RequestClient, RequestClientBuilder};
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::envelope::Envelope;
    pub use crate::error::{HttpError, TransportErrorKind};
    pub use crate::interceptor::{HttpInterceptor, HttpRequestContext, InterceptorRegistry};
    pub use crate::options::{
        CallKind, InterceptableOptions, Method, RequestOptions, UploadFileOptions,
        UploadFileResponse,
    };
    pub use crate::platform::{Navigator, Notifier, Toast, ToastIcon};
    pub use crate::session::{MemberProfile, MemorySession, NoSession, SessionStore};
    pub use crate::transport::{HttpTransport, ReqwestTransport, TransportResponse};
}
