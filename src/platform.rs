//! Host UI collaborators: page navigation and toasts.
//!
//! The request adapter only ever asks for two side effects, opening the
//! login page and showing a short message. Hosts implement these traits;
//! the `Tracing*` defaults just log.

use std::fmt;

/// Page router of the host app.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, url: &str);
}

/// Icon shown next to a toast title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastIcon {
    Success,
    Error,
    Loading,
    /// Text only
    #[default]
    None,
}

impl fmt::Display for ToastIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Loading => "loading",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

/// Transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub icon: ToastIcon,
}

impl Toast {
    /// Text-only toast.
    pub fn text<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            icon: ToastIcon::None,
        }
    }
}

/// Toast primitive of the host app.
pub trait Notifier: Send + Sync {
    fn show_toast(&self, toast: &Toast);
}

/// Navigator that only records the jump in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate_to(&self, url: &str) {
        tracing::info!(target: "miniapp_http::platform", %url, "navigate");
    }
}

/// Notifier that only records the toast in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_toast(&self, toast: &Toast) {
        tracing::info!(target: "miniapp_http::platform", title=%toast.title, icon=%toast.icon, "toast");
    }
}
