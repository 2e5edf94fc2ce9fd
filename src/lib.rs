pub mod api;
pub mod assets;
pub mod auth;
pub mod cli;
pub mod client;
pub mod guard;
pub mod jwt;
pub mod pages;
pub mod routes;

use api::{AuthApiState, create_api_router};
use assets::public_handler;
use auth::{SessionCookie, SessionReader};
use axum::{Router, middleware, routing::get};
use client::{ApiClient, AuthService, ClientConfig, ClientError, LogNavigator, NoSession};
use guard::{GuardState, edge_guard};
use jwt::JwtConfig;
use routes::{RouteTable, paths};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use url::Url;

pub struct ServerConfig {
    /// Public URL of the site (origin for callback URLs and navigation targets)
    pub site_url: Url,
    /// Base URL of the backend REST API
    pub api_server_url: Url,
    /// Secret for signing session tokens
    pub session_secret: Vec<u8>,
    /// Session cookie attributes
    pub cookie: SessionCookie,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Result<Router, ClientError> {
    let jwt = Arc::new(JwtConfig::new(&config.session_secret));
    let sessions = SessionReader::new(jwt, config.cookie.clone());
    // Loaded once, shared read-only by every request
    let routes = Arc::new(RouteTable::default());

    let guard_state = GuardState {
        sessions: sessions.clone(),
        routes: routes.clone(),
    };

    let backend = ApiClient::new(
        ClientConfig::new(config.api_server_url.clone(), config.site_url.clone()),
        NoSession,
        LogNavigator,
    )?;

    let api_router = create_api_router(AuthApiState {
        sessions,
        routes,
        auth: Arc::new(AuthService::new(backend)),
        site_url: config.site_url.clone(),
    });

    Ok(Router::new()
        .nest(paths::API, api_router)
        .route("/public/{*path}", get(public_handler))
        .merge(pages::router(guard_state.clone()))
        .layer(middleware::from_fn_with_state(
            guard_state,
            edge_guard::<GuardState>,
        )))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config).map_err(std::io::Error::other)?;
    axum::serve(listener, app).await
}

/// Start the server on the given port in a background task.
/// Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> std::io::Result<(tokio::task::JoinHandle<()>, SocketAddr)> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
