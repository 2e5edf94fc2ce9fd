//! Session endpoints: credential sign-in, sign-up, session lookup, sign-out.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use url::Url;

use super::error::{ApiError, ResultExt};
use crate::auth::{MaybeSession, SessionReader, SessionView};
use crate::client::{AuthService, ClientError, Credentials, LogNavigator, NoSession, SignUpRequest};
use crate::impl_has_guard_state;
use crate::routes::RouteTable;

/// Backend auth calls made by the server itself: no session, no navigation.
pub type BackendAuth = AuthService<NoSession, LogNavigator>;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone)]
pub struct AuthApiState {
    pub sessions: SessionReader,
    pub routes: Arc<RouteTable>,
    pub auth: Arc<BackendAuth>,
    /// Public site URL; callback URLs must stay on its origin
    pub site_url: Url,
}

impl_has_guard_state!(AuthApiState);

pub fn router(state: AuthApiState) -> Router {
    Router::new()
        .route("/callback/credentials", post(sign_in))
        .route("/sign-up", post(sign_up))
        .route("/session", get(session))
        .route("/signout", post(sign_out))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    callback_url: Option<String>,
}

/// Exchange credentials with the backend and store the result in the session cookie.
async fn sign_in(
    State(state): State<AuthApiState>,
    Json(form): Json<SignInForm>,
) -> Result<Response, ApiError> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let credentials = Credentials {
        email: email.to_string(),
        password: form.password,
    };

    let response = state.auth.sign_in(&credentials).await.map_err(|e| match e {
        ClientError::Status { .. } => {
            warn!(error = %e, "Backend rejected sign in");
            ApiError::unauthorized(e.backend_message().unwrap_or_else(|| "Login failed".into()))
        }
        other => ApiError::internal_error("Login failed", other),
    })?;

    let identity = response
        .into_identity()
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let issued = state
        .sessions
        .jwt()
        .issue_session(&identity)
        .internal_err("Failed to issue session")?;

    info!(user = %identity.user_id, "Signed in");

    let url = resolve_callback(&state.site_url, form.callback_url.as_deref());
    Ok((
        [(header::SET_COOKIE, state.sessions.cookie().set_header(&issued.token))],
        Json(json!({ "url": url })),
    )
        .into_response())
}

#[derive(Deserialize)]
struct SignUpForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    fullname: String,
    #[serde(default)]
    password: String,
}

impl SignUpForm {
    /// First failing rule wins, field order: email, full name, password.
    fn validate(&self) -> Result<(), ApiError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ApiError::bad_request("Email is required"));
        }
        if !is_valid_email(email) {
            return Err(ApiError::bad_request("Invalid email address"));
        }
        if self.fullname.trim().is_empty() {
            return Err(ApiError::bad_request("Full name is required"));
        }
        if self.password.is_empty() {
            return Err(ApiError::bad_request("Password is required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ApiError::bad_request(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

async fn sign_up(
    State(state): State<AuthApiState>,
    Json(form): Json<SignUpForm>,
) -> Result<Response, ApiError> {
    form.validate()?;

    let request = SignUpRequest {
        email: form.email.trim().to_string(),
        password: form.password,
        full_name: form.fullname.trim().to_string(),
    };

    let payload = state.auth.sign_up(&request).await.map_err(|e| match e.status() {
        Some(status) if status.is_client_error() => {
            ApiError::bad_request(e.backend_message().unwrap_or_else(|| "Sign up failed".into()))
        }
        _ => ApiError::internal_error("Sign up failed", e),
    })?;

    info!(email = %request.email, "Signed up");
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

async fn session(MaybeSession(session): MaybeSession) -> Response {
    match session {
        Some(session) => Json(SessionView::from(&session)).into_response(),
        None => Json(json!({})).into_response(),
    }
}

async fn sign_out(
    State(state): State<AuthApiState>,
    MaybeSession(session): MaybeSession,
) -> Response {
    if let Some(session) = session {
        info!(user = %session.user_id, "Signed out");
    }
    (
        [(header::SET_COOKIE, state.sessions.cookie().clear_header())],
        Json(json!({ "url": state.site_url.as_str() })),
    )
        .into_response()
}

/// Keep relative and same-origin callbacks, send everything else to the site root.
pub fn resolve_callback(site_url: &Url, callback: Option<&str>) -> String {
    let Some(callback) = callback.filter(|c| !c.is_empty()) else {
        return site_url.to_string();
    };
    match site_url.join(callback) {
        Ok(destination) if destination.origin() == site_url.origin() => destination.to_string(),
        _ => site_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://blog.example.com").unwrap()
    }

    #[test]
    fn test_resolve_relative_callback() {
        assert_eq!(
            resolve_callback(&site(), Some("/profile")),
            "https://blog.example.com/profile"
        );
    }

    #[test]
    fn test_resolve_same_origin_callback() {
        assert_eq!(
            resolve_callback(&site(), Some("https://blog.example.com/blogs/x?y=1")),
            "https://blog.example.com/blogs/x?y=1"
        );
    }

    #[test]
    fn test_resolve_foreign_callback_falls_back() {
        assert_eq!(
            resolve_callback(&site(), Some("https://evil.example.net/phish")),
            "https://blog.example.com/"
        );
        assert_eq!(
            resolve_callback(&site(), Some("//evil.example.net/phish")),
            "https://blog.example.com/"
        );
        assert_eq!(
            resolve_callback(&site(), Some("http://blog.example.com/profile")),
            "https://blog.example.com/"
        );
    }

    #[test]
    fn test_resolve_missing_callback() {
        assert_eq!(resolve_callback(&site(), None), "https://blog.example.com/");
        assert_eq!(resolve_callback(&site(), Some("")), "https://blog.example.com/");
    }

    fn form(email: &str, fullname: &str, password: &str) -> SignUpForm {
        SignUpForm {
            email: email.into(),
            fullname: fullname.into(),
            password: password.into(),
        }
    }

    fn message(result: Result<(), ApiError>) -> String {
        match result {
            Err(ApiError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_sign_up_validation_messages() {
        assert_eq!(message(form("", "Ann", "password1").validate()), "Email is required");
        assert_eq!(
            message(form("not-an-email", "Ann", "password1").validate()),
            "Invalid email address"
        );
        assert_eq!(
            message(form("ann@example.com", "  ", "password1").validate()),
            "Full name is required"
        );
        assert_eq!(
            message(form("ann@example.com", "Ann", "").validate()),
            "Password is required"
        );
        assert_eq!(
            message(form("ann@example.com", "Ann", "short").validate()),
            "Password must be at least 8 characters"
        );
        assert!(form("ann@example.com", "Ann", "longenough").validate().is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b.co."));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b@c.co"));
    }
}
