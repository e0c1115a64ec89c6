use std::env;

/// Default OTLP endpoint when `OTEL_EXPORTER_OTLP_ENDPOINT` is unset.
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Configuration for the front gateway, read from the environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: String,
    /// Full URL of the resolver's `/weather` endpoint.
    pub resolver_url: String,
    pub otlp_endpoint: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            listen_addr: env_or("GATEWAY_LISTEN_ADDR", "0.0.0.0:8080"),
            resolver_url: env_or("RESOLVER_URL", "http://localhost:8081/weather"),
            otlp_endpoint: env_or("OTEL_EXPORTER_OTLP_ENDPOINT", DEFAULT_OTLP_ENDPOINT),
        }
    }
}

/// Configuration for the resolver service, read from the environment.
///
/// A missing `WEATHERAPI_KEY` is not a startup failure: the process still
/// starts, and every weather-dependent request fails with 500 instead.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub listen_addr: String,
    pub viacep_base_url: String,
    pub weatherapi_base_url: String,
    pub weatherapi_key: Option<String>,
    pub otlp_endpoint: String,
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        Self {
            listen_addr: env_or("RESOLVER_LISTEN_ADDR", "0.0.0.0:8081"),
            viacep_base_url: env_or("VIACEP_BASE_URL", "https://viacep.com.br"),
            weatherapi_base_url: env_or("WEATHERAPI_BASE_URL", "http://api.weatherapi.com"),
            weatherapi_key: env::var("WEATHERAPI_KEY").ok().filter(|k| !k.is_empty()),
            otlp_endpoint: env_or("OTEL_EXPORTER_OTLP_ENDPOINT", DEFAULT_OTLP_ENDPOINT),
        }
    }
}
