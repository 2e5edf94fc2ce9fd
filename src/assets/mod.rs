mod embed;
mod handlers;
mod response;

pub use embed::PublicAssets;
pub use handlers::public_handler;
pub use response::{mime_from_path, serve_asset};
