use clap::Parser;
use quillgate::cli::{Args, build_config, init_logging, load_session_secret, validate_url};
use quillgate::create_app;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(session_secret) = load_session_secret(args.session_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let Some(site_url) = validate_url("site-url", &args.site_url) else {
        std::process::exit(1);
    };

    let Some(api_server_url) = validate_url("api-server-url", &args.api_server_url) else {
        std::process::exit(1);
    };

    let config = build_config(
        site_url,
        api_server_url,
        session_secret,
        args.force_secure_cookies,
        args.cookie_domain,
        args.cookie_same_site,
    );

    let app = create_app(&config).unwrap_or_else(|e| {
        error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap_or_else(|e| {
        error!(error = %e, "Failed to read local address");
        std::process::exit(1);
    });

    info!(address = %local_addr, "Listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
