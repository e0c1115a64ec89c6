use crate::model::ResolvedCity;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on every outbound lookup, fixed by contract.
pub(crate) const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

pub mod viacep;
pub mod weatherapi;

pub use viacep::ViaCepProvider;
pub use weatherapi::WeatherApiProvider;

/// Outcomes of a CEP → city lookup, one variant per failure class.
///
/// Handlers switch on the variant to pick a status code; the display
/// strings are diagnostics only and are never matched on.
#[derive(Debug, Error)]
pub enum CityLookupError {
    /// The provider knows the CEP format but has no record for it.
    /// An expected outcome, not a fault.
    #[error("CEP not found")]
    NotFound,

    /// Transport error, timeout, or malformed provider payload.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Outcomes of a city → temperature lookup.
#[derive(Debug, Error)]
pub enum WeatherLookupError {
    /// The weather provider does not recognise the city name.
    #[error("city not found")]
    CityNotFound,

    /// The provider credential is absent from the configuration; no
    /// network call is attempted.
    #[error("weather API key is not configured")]
    MissingApiKey,

    /// The provider rejected the credential.
    #[error("weather provider rejected credentials with status {0}")]
    Auth(u16),

    /// Transport error, timeout, malformed payload, or a provider error
    /// code other than "location not found".
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Resolves a validated CEP to its locality.
#[async_trait]
pub trait CityResolver: Send + Sync + Debug {
    async fn resolve(&self, cep: &str) -> Result<ResolvedCity, CityLookupError>;
}

/// Returns the current temperature in Celsius for a named city.
#[async_trait]
pub trait TemperatureSource: Send + Sync + Debug {
    async fn current_celsius(&self, city: &str) -> Result<f64, WeatherLookupError>;
}
