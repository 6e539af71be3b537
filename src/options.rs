//! Outgoing call options.
//!
//! `RequestOptions` and `UploadFileOptions` are built by the caller, mutated
//! once by the interceptors of their [`CallKind`], then consumed by the
//! transport.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Hook point an interceptor is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// General request call
    Request,
    /// Multipart file upload
    UploadFile,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::UploadFile => "uploadFile",
        }
    }
}

/// HTTP method of a [`RequestOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// The parts of an outgoing call an interceptor may touch.
///
/// Implemented by both option types so one interceptor serves every
/// [`CallKind`].
pub trait InterceptableOptions: Send {
    fn url(&self) -> &str;
    fn set_url(&mut self, url: String);
    fn header(&self) -> &HashMap<String, String>;
    fn header_mut(&mut self) -> &mut HashMap<String, String>;
    fn timeout(&self) -> Option<Duration>;
    fn set_timeout(&mut self, timeout: Duration);
}

/// Options of one request call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Target path or absolute URL
    pub url: String,
    pub method: Method,
    /// Header name to value
    pub header: HashMap<String, String>,
    pub timeout: Option<Duration>,
    /// JSON body; sent as the query string for GET
    pub data: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn new<S: Into<String>>(method: Method, url: S) -> Self {
        Self {
            url: url.into(),
            method,
            ..Default::default()
        }
    }

    pub fn get<S: Into<String>>(url: S) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post<S: Into<String>>(url: S) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put<S: Into<String>>(url: S) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete<S: Into<String>>(url: S) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.header.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl InterceptableOptions for RequestOptions {
    fn url(&self) -> &str {
        &self.url
    }
    fn set_url(&mut self, url: String) {
        self.url = url;
    }
    fn header(&self) -> &HashMap<String, String> {
        &self.header
    }
    fn header_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.header
    }
    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }
}

/// Options of one file upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFileOptions {
    pub url: String,
    pub header: HashMap<String, String>,
    pub timeout: Option<Duration>,
    /// Local file sent as the file part
    pub file_path: PathBuf,
    /// Form field name of the file part
    pub name: String,
    /// Extra text fields
    pub form_data: HashMap<String, String>,
}

impl UploadFileOptions {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(url: S, file_path: P) -> Self {
        Self {
            url: url.into(),
            header: HashMap::new(),
            timeout: None,
            file_path: file_path.into(),
            name: "file".to_string(),
            form_data: HashMap::new(),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_form_field<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.form_data.insert(key.into(), value.into());
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.header.insert(key.into(), value.into());
        self
    }
}

impl InterceptableOptions for UploadFileOptions {
    fn url(&self) -> &str {
        &self.url
    }
    fn set_url(&mut self, url: String) {
        self.url = url;
    }
    fn header(&self) -> &HashMap<String, String> {
        &self.header
    }
    fn header_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.header
    }
    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }
}

/// Raw answer of an upload, not envelope-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFileResponse {
    pub status_code: u16,
    /// Response body text
    pub data: String,
}
