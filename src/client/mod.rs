//! Authenticated REST client for the blog backend.
//!
//! Wraps [`reqwest`] with the session-aware request policy:
//! - attaches `Authorization: Bearer <token>` from the injected
//!   [`SessionSource`] unless disabled per call,
//! - unwraps successful responses to their JSON payload,
//! - on 401 signs out and sends the user to the login page, on 404 sends
//!   them to the not-found page, via the injected [`Navigator`].
//!
//! Failed calls are never retried.

mod error;
mod navigator;
mod service;
mod session;

pub use error::ClientError;
pub use navigator::{LogNavigator, Navigator};
pub use service::{
    AuthService, BackendUser, Credentials, SignInData, SignInResponse, SignUpRequest,
};
pub use session::{FixedSession, HttpSessionSource, NoSession, SessionSource};

use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::routes::paths;

/// Header carrying the caller's UTC offset.
pub const TIMEZONE_HEADER: &str = "timezone";

/// Per-call options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    /// Skip bearer attachment (sign-in, sign-up).
    pub disabled_token: bool,
}

impl RequestOptions {
    pub fn without_token() -> Self {
        Self {
            disabled_token: true,
        }
    }
}

/// Client endpoints and headers.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API base, e.g. `https://api.example.com/v1`
    pub api_base_url: Url,
    /// Site origin used to build login and not-found navigation targets
    pub app_origin: Url,
    /// Minutes behind UTC, browser `getTimezoneOffset` convention
    pub timezone_offset_minutes: i32,
}

impl ClientConfig {
    pub fn new(api_base_url: Url, app_origin: Url) -> Self {
        Self {
            api_base_url,
            app_origin,
            timezone_offset_minutes: local_timezone_offset(),
        }
    }
}

/// Offset of the local clock in minutes, positive west of UTC.
pub fn local_timezone_offset() -> i32 {
    -(chrono::Local::now().offset().local_minus_utc() / 60)
}

/// HTTP client for the blog backend.
pub struct ApiClient<S, N> {
    http: reqwest::Client,
    config: ClientConfig,
    sessions: S,
    navigator: N,
}

impl<S, N> ApiClient<S, N>
where
    S: SessionSource,
    N: Navigator,
{
    pub fn new(config: ClientConfig, sessions: S, navigator: N) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http, config, sessions, navigator))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        config: ClientConfig,
        sessions: S,
        navigator: N,
    ) -> Self {
        Self {
            http,
            config,
            sessions,
            navigator,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let request = self.request(Method::GET, path)?;
        self.send(request, options).await
    }

    pub async fn get_with_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
        options: RequestOptions,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request, options).await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request, options).await
    }

    pub async fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        self.send(request, options).await
    }

    pub async fn patch<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PATCH, path)?.json(body);
        self.send(request, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let request = self.request(Method::DELETE, path)?;
        self.send(request, options).await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = join_api_url(&self.config.api_base_url, path)?;
        Ok(self
            .http
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(TIMEZONE_HEADER, self.config.timezone_offset_minutes.to_string()))
    }

    /// Attach the bearer token of the session snapshot taken now.
    async fn authorize(&self, request: RequestBuilder, options: RequestOptions) -> RequestBuilder {
        if options.disabled_token {
            return request;
        }
        match self.sessions.current_session().await.and_then(|s| s.access_token) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let response = self.authorize(request, options).await.send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            let payload: T = if bytes.is_empty() {
                serde_json::from_slice(b"null")?
            } else {
                serde_json::from_slice(&bytes)?
            };
            return Ok(payload);
        }

        let body = response.text().await.unwrap_or_default();
        self.recover(status);
        Err(ClientError::Status { status, body })
    }

    fn recover(&self, status: StatusCode) {
        match status {
            StatusCode::UNAUTHORIZED => self.navigator.sign_out(&self.site_url(paths::LOGIN)),
            StatusCode::NOT_FOUND => self.navigator.navigate(&self.site_url(paths::NOT_FOUND)),
            _ => {}
        }
    }

    fn site_url(&self, path: &str) -> String {
        format!("{}{}", self.config.app_origin.origin().ascii_serialization(), path)
    }
}

/// Append an endpoint path to the API base, keeping the base's own path.
fn join_api_url(base: &Url, path: &str) -> Result<Url, ClientError> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{}/{}", base, path))?)
}
