use axum::{extract::Path, response::Response};

use super::embed::PublicAssets;
use super::response::serve_asset;

/// Serve files under `/public` (excluded from the access guard)
pub async fn public_handler(Path(path): Path<String>) -> Response {
    serve_asset::<PublicAssets>(&path)
}
