//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::auth::{SameSite, SessionCookie};
use clap::Parser;
use tracing::{error, info};
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "Quillgate",
    about = "Blog front server with session-based route protection"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "7291")]
    pub port: u16,

    /// Public URL of the site (e.g., "https://blog.example.com")
    #[arg(long, env = "SITE_URL", default_value = "http://localhost:7291")]
    pub site_url: String,

    /// Base URL of the backend REST API (e.g., "https://api.example.com/v1")
    #[arg(long, env = "API_SERVER_URL")]
    pub api_server_url: String,

    /// Path to file containing the session secret. Prefer using SESSION_SECRET env var instead
    #[arg(long)]
    pub session_secret_file: Option<String>,

    /// Mark the session cookie Secure even when the site URL is plain HTTP
    #[arg(long)]
    pub force_secure_cookies: bool,

    /// Domain attribute of the session cookie. Defaults to the site host
    #[arg(long)]
    pub cookie_domain: Option<String>,

    /// SameSite attribute of the session cookie
    #[arg(long, default_value = "lax")]
    pub cookie_same_site: SameSite,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load the session secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_session_secret(session_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("SESSION_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("SESSION_SECRET") };
        secret
    } else if let Some(path) = session_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read session secret file");
                return None;
            }
        }
    } else {
        error!(
            "Session secret is required. Set SESSION_SECRET environment variable (recommended) or use --session-secret-file"
        );
        return None;
    };

    if !secret_is_long_enough(&secret) {
        error!(
            "Session secret is shorter than {} characters. Use a longer secret",
            MIN_SESSION_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

fn secret_is_long_enough(secret: &str) -> bool {
    secret.len() >= MIN_SESSION_SECRET_LENGTH
}

/// Parse an http(s) URL given on the command line.
/// Returns None and logs an error if validation fails.
pub fn validate_url(name: &str, value: &str) -> Option<Url> {
    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(e) => {
            error!(option = %name, url = %value, error = %e, "Invalid URL");
            return None;
        }
    };

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        error!(option = %name, url = %value, "URL must be http or https with a host");
        return None;
    }

    Some(url)
}

/// Whether the session cookie gets the `Secure` attribute.
pub fn is_secure_cookie(site_url: &Url, force: bool) -> bool {
    force || site_url.scheme() == "https"
}

/// Cookie `Domain`: the explicit value, else the site host unless it is local.
pub fn cookie_domain(site_url: &Url, explicit: Option<String>) -> Option<String> {
    if let Some(domain) = explicit.filter(|d| !d.is_empty()) {
        return Some(domain);
    }
    match site_url.host_str() {
        Some("localhost") | Some("127.0.0.1") | None => None,
        Some(host) => Some(host.to_string()),
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    site_url: Url,
    api_server_url: Url,
    session_secret: String,
    force_secure_cookies: bool,
    cookie_domain_arg: Option<String>,
    same_site: SameSite,
) -> ServerConfig {
    let secure = is_secure_cookie(&site_url, force_secure_cookies);
    let domain = cookie_domain(&site_url, cookie_domain_arg);
    let cookie = SessionCookie::new(secure, domain, same_site);

    info!(
        site = %site_url,
        api = %api_server_url,
        cookie = %cookie.name(),
        secure,
        "Configuration loaded"
    );

    ServerConfig {
        site_url,
        api_server_url,
        session_secret: session_secret.into_bytes(),
        cookie,
    }
}
