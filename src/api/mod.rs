mod auth;
mod error;

use axum::Router;

pub use auth::{AuthApiState, BackendAuth, resolve_callback};
pub use error::{ApiError, ResultExt};

/// Create the API router.
pub fn create_api_router(auth_state: AuthApiState) -> Router {
    Router::new().nest("/auth", auth::router(auth_state))
}
