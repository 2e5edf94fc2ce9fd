//! Axum extractors re-checking the session inside page groups.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::GuardRedirect;
use super::state::HasGuardState;
use super::types::Session;
use crate::guard::Decision;
use crate::routes::Category;

/// Evaluate the shared access policy for a page group of the given category.
fn layout_check<S>(
    category: Category,
    parts: &Parts,
    state: &S,
) -> Result<Option<Session>, GuardRedirect>
where
    S: HasGuardState,
{
    let session = state.sessions().read(&parts.headers);
    let decision = Decision::for_category(category, session.is_some(), parts.uri.path());

    match decision.location() {
        None => Ok(session),
        Some(location) => {
            tracing::debug!(path = %parts.uri.path(), ?category, "Layout guard redirect");
            Err(GuardRedirect { location })
        }
    }
}

/// Extractor for pages that require a session.
/// Redirects to login (with a callback to the current page) otherwise.
pub struct RequireSession(pub Session);

impl<S> FromRequestParts<S> for RequireSession
where
    S: HasGuardState + Send + Sync,
{
    type Rejection = GuardRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A protected check only passes with a session present.
        layout_check(Category::Protected, parts, state)?
            .map(RequireSession)
            .ok_or_else(|| GuardRedirect {
                location: crate::guard::login_location(parts.uri.path()),
            })
    }
}

/// Extractor for pages only reachable without a session (login, sign-up).
/// Redirects signed-in users home.
pub struct GuestOnly;

impl<S> FromRequestParts<S> for GuestOnly
where
    S: HasGuardState + Send + Sync,
{
    type Rejection = GuardRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        layout_check(Category::AuthOnly, parts, state).map(|_| GuestOnly)
    }
}

/// Optional session extractor - never fails.
/// Useful for public pages that render differently for signed-in readers.
pub struct MaybeSession(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: HasGuardState + Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(state.sessions().read(&parts.headers)))
    }
}
