//! Session lookup from request cookies.

use std::sync::Arc;

use axum::http::HeaderMap;

use super::cookie::{SessionCookie, get_cookie};
use super::types::Session;
use crate::jwt::JwtConfig;

/// Reads and verifies the session cookie of an incoming request.
#[derive(Clone)]
pub struct SessionReader {
    jwt: Arc<JwtConfig>,
    cookie: SessionCookie,
}

impl SessionReader {
    pub fn new(jwt: Arc<JwtConfig>, cookie: SessionCookie) -> Self {
        Self { jwt, cookie }
    }

    pub fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }

    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    /// Returns the session for a validly signed, unexpired token.
    /// Anything else, malformed tokens included, reads as anonymous.
    pub fn read(&self, headers: &HeaderMap) -> Option<Session> {
        let token = get_cookie(headers, self.cookie.name())?;
        match self.jwt.validate_session(token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session cookie");
                None
            }
        }
    }
}
