//! Navigation side effects triggered by backend failures.

use std::sync::Arc;

/// Recovery actions the API client performs on 401 and 404 responses.
pub trait Navigator: Send + Sync {
    /// Drop the local session, then go to `callback_url`.
    fn sign_out(&self, callback_url: &str);
    /// Go to `url`.
    fn navigate(&self, url: &str);
}

impl<T: Navigator> Navigator for Arc<T> {
    fn sign_out(&self, callback_url: &str) {
        (**self).sign_out(callback_url)
    }

    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }
}

/// Server-side navigator: there is no browser to move, so it only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn sign_out(&self, callback_url: &str) {
        tracing::warn!(callback = %callback_url, "Backend rejected credentials");
    }

    fn navigate(&self, url: &str) {
        tracing::debug!(url = %url, "Backend resource not found");
    }
}
