//! Guard rejection type.

use axum::response::{IntoResponse, Redirect, Response};

/// Layout guard rejection - a silent temporary redirect, never an error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRedirect {
    pub location: String,
}

impl IntoResponse for GuardRedirect {
    fn into_response(self) -> Response {
        Redirect::temporary(&self.location).into_response()
    }
}
