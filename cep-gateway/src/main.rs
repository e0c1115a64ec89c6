//! Binary crate for the front gateway.
//!
//! Accepts `POST /cep`, validates the postal code, and relays the resolver
//! service's answer verbatim.

use anyhow::Result;
use cep_core::{GatewayConfig, telemetry};

mod app;

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env();

    // Held until after the server exits so pending spans get flushed.
    let _telemetry = telemetry::init("cep-gateway", &config.otlp_endpoint)?;

    let router = app::router(app::AppState::new(&config));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "gateway listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
