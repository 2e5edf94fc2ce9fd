use rust_embed::Embed;

/// Files under `public/` (robots.txt, icons), served without auth
#[derive(Embed)]
#[folder = "public/"]
pub struct PublicAssets;
