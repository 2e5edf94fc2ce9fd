use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

/// Cache duration for public files (1 hour, names are not content-hashed)
pub const PUBLIC_CACHE: &str = "public, max-age=3600";

/// Get MIME type from file extension. Only supports types we actually serve.
#[inline]
pub fn mime_from_path(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html",
        Some("txt") => "text/plain",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Serve a file from embedded assets
#[inline]
pub fn serve_asset<T: Embed>(path: &str) -> Response {
    match T::get(path) {
        Some(content) => (
            [
                (header::CONTENT_TYPE, mime_from_path(path)),
                (header::CACHE_CONTROL, PUBLIC_CACHE),
            ],
            content.data,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
