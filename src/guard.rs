//! Edge access guard.
//!
//! Runs before any page handler. Classifies the request path, reads the
//! session cookie when the category needs it, and either passes the request
//! through untouched or short-circuits with a temporary redirect.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use crate::auth::{HasGuardState, SessionReader};
use crate::impl_has_guard_state;
use crate::routes::{Category, RouteTable, paths};

/// Query parameter carrying the page to return to after signing in.
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// State shared by the edge guard and the page routes.
#[derive(Clone)]
pub struct GuardState {
    pub sessions: SessionReader,
    pub routes: Arc<RouteTable>,
}

impl_has_guard_state!(GuardState);

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectHome,
    RedirectLogin { callback_url: String },
}

impl Decision {
    /// The single access policy shared by the edge guard and the layout guards.
    pub fn for_category(category: Category, authenticated: bool, path: &str) -> Self {
        match category {
            Category::Excluded | Category::Api => Decision::Allow,
            Category::AuthOnly if authenticated => Decision::RedirectHome,
            Category::Protected if !authenticated => Decision::RedirectLogin {
                callback_url: path.to_string(),
            },
            _ => Decision::Allow,
        }
    }

    /// Redirect target, or `None` when the request may proceed.
    pub fn location(&self) -> Option<String> {
        match self {
            Decision::Allow => None,
            Decision::RedirectHome => Some(paths::HOME.to_string()),
            Decision::RedirectLogin { callback_url } => Some(login_location(callback_url)),
        }
    }

    pub fn into_redirect(self) -> Option<Redirect> {
        self.location().map(|location| Redirect::temporary(&location))
    }
}

/// Login page URL carrying an URL-encoded callback path.
pub fn login_location(callback_url: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(callback_url.as_bytes()).collect();
    format!("{}?{}={}", paths::LOGIN, CALLBACK_PARAM, encoded)
}

/// Axum middleware applying the route table to every request.
pub async fn edge_guard<S>(State(state): State<S>, request: Request, next: Next) -> Response
where
    S: HasGuardState + Clone + Send + Sync + 'static,
{
    let path = request.uri().path().to_owned();
    let category = state.routes().classify(&path);

    if category.bypasses_guard() {
        return next.run(request).await;
    }

    let session = state.sessions().read(request.headers());
    let decision = Decision::for_category(category, session.is_some(), &path);

    match decision.into_redirect() {
        Some(redirect) => {
            tracing::debug!(path = %path, ?category, "Edge guard redirect");
            redirect.into_response()
        }
        None => next.run(request).await,
    }
}
