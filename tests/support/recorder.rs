//! Recording host collaborators for integration tests.

use miniapp_http::platform::{Navigator, Notifier, Toast};
use std::sync::Mutex;

/// Records every navigation and toast the client asks for.
#[derive(Default)]
pub struct HostRecorder {
    navigations: Mutex<Vec<String>>,
    toasts: Mutex<Vec<Toast>>,
}

impl HostRecorder {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn toast_titles(&self) -> Vec<String> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.title.clone())
            .collect()
    }
}

impl Navigator for HostRecorder {
    fn navigate_to(&self, url: &str) {
        self.navigations.lock().unwrap().push(url.to_string());
    }
}

impl Notifier for HostRecorder {
    fn show_toast(&self, toast: &Toast) {
        self.toasts.lock().unwrap().push(toast.clone());
    }
}
