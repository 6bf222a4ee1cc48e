//! Antiban HTTP Server Binary
//!
//! Entry point for the scheduling REST API. Loads interval configuration,
//! sets up the HTTP router and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin antiban-server
//!
//! # Explicit configuration file with one interval overridden
//! ANTIBAN_CONFIG=/etc/antiban.toml ANTIBAN_GLOBAL_INTERVAL_SECS=5 \
//!   cargo run --bin antiban-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `ANTIBAN_CONFIG`: Path to a TOML config file (default: search `antiban.toml`)
//! - `ANTIBAN_*_INTERVAL_SECS`: Per-interval overrides
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use antiban::http::{create_router, AppState};
use antiban::SchedulerConfig;

fn load_config() -> anyhow::Result<SchedulerConfig> {
    let base = match env::var("ANTIBAN_CONFIG") {
        Ok(path) => SchedulerConfig::from_file(&path)?,
        Err(_) => SchedulerConfig::from_default_location().unwrap_or_else(|e| {
            warn!("{}; using default intervals", e);
            SchedulerConfig::default()
        }),
    };
    Ok(base.with_env_overrides()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Antiban HTTP Server");

    let config = load_config()?;
    info!(
        "Intervals: global={}s recipient={}s recipient_broadcast={}s",
        config.global_interval.num_seconds(),
        config.recipient_interval.num_seconds(),
        config.recipient_broadcast_interval.num_seconds()
    );

    let state = AppState::with_config(config);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
