//! Session accessors injected into the API client.

use std::future::Future;
use std::sync::Arc;

use reqwest::header;
use url::Url;

use crate::auth::{Session, SessionView};

/// Supplies the current session at send time. Each outbound call takes its
/// own snapshot; implementations must not fail, only return `None`.
pub trait SessionSource: Send + Sync {
    fn current_session(&self) -> impl Future<Output = Option<Session>> + Send;
}

impl<T: SessionSource> SessionSource for Arc<T> {
    fn current_session(&self) -> impl Future<Output = Option<Session>> + Send {
        (**self).current_session()
    }
}

/// Never has a session. Used for server-side backend calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionSource for NoSession {
    async fn current_session(&self) -> Option<Session> {
        None
    }
}

/// A session known up front.
#[derive(Debug, Clone, Default)]
pub struct FixedSession(pub Option<Session>);

impl SessionSource for FixedSession {
    async fn current_session(&self) -> Option<Session> {
        self.0.clone()
    }
}

/// Re-fetches the session from the site's session endpoint on every call,
/// forwarding the caller's cookies.
#[derive(Debug, Clone)]
pub struct HttpSessionSource {
    http: reqwest::Client,
    session_url: Url,
    cookie: Option<String>,
}

impl HttpSessionSource {
    /// `site_url` is the origin serving `/api/auth/session`.
    pub fn new(site_url: &Url, cookie: Option<String>) -> Result<Self, url::ParseError> {
        Ok(Self {
            http: reqwest::Client::new(),
            session_url: site_url.join("/api/auth/session")?,
            cookie,
        })
    }

    pub fn with_client(
        http: reqwest::Client,
        site_url: &Url,
        cookie: Option<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            session_url: site_url.join("/api/auth/session")?,
            cookie,
        })
    }

    async fn fetch(&self) -> Result<Option<Session>, reqwest::Error> {
        let mut request = self.http.get(self.session_url.clone());
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let json: serde_json::Value = request.send().await?.error_for_status()?.json().await?;
        // Anonymous callers get `{}`.
        Ok(serde_json::from_value::<SessionView>(json)
            .ok()
            .map(Session::from))
    }
}

impl SessionSource for HttpSessionSource {
    async fn current_session(&self) -> Option<Session> {
        match self.fetch().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(url = %self.session_url, error = %e, "Session lookup failed");
                None
            }
        }
    }
}
