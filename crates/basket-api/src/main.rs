//! # Basket RS
//!
//! Cart, checkout and address-book service.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export TOKEN_SECRET=change-me
//! export LOG_FORMAT=json   # optional
//!
//! # Run the server
//! basket
//! ```

use basket_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let (plain, json) = if json_logs {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };
    tracing_subscriber::registry()
        .with(plain)
        .with(json)
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;
    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.list().await?.len());
    info!(
        "Store deadlines: mutation {:?}, read {:?}",
        state.config.deadlines.mutation, state.config.deadlines.read
    );
    let is_prod = state.config.is_production();

    let app = routes::create_router(state);

    info!("Basket starting on http://{}", addr);
    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("New account: POST http://{}/api/v1/accounts", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

fn print_banner() {
    println!(
        r#"
  Basket RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Carts, orders, addresses
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
