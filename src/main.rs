mod config;
mod errors;
mod models;
mod server;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("greekboard starting");

    // Load config (defaults are priced once here, so a bad default fails fast)
    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        spot = cfg.defaults.spot,
        strike = cfg.defaults.strike,
        expiry = cfg.defaults.time_to_expiry,
        rate = cfg.defaults.rate,
        vol = cfg.defaults.volatility,
        curve_points = cfg.curve.points,
        "defaults loaded"
    );

    let port = cfg.server_port;
    let dashboard_dir = cfg.dashboard_dir.clone();
    let app = server::router(AppState::new(cfg));

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(dashboard = %dashboard_dir.display(), "server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
