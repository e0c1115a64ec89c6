//! Binary crate for the resolver service.
//!
//! Accepts `POST /weather`, resolves the CEP to a city via ViaCEP, fetches
//! the current temperature via WeatherAPI.com, and answers in Celsius,
//! Fahrenheit and Kelvin.

use anyhow::Result;
use cep_core::{ResolverConfig, telemetry};

mod app;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ResolverConfig::from_env();

    // Held until after the server exits so pending spans get flushed.
    let _telemetry = telemetry::init("cep-resolver", &config.otlp_endpoint)?;

    if config.weatherapi_key.is_none() {
        // Not fatal: the process serves, weather-dependent requests fail.
        tracing::warn!("WEATHERAPI_KEY is not set; weather lookups will fail");
    }

    let router = app::router(app::AppState::new(&config));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "resolver listening");

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
