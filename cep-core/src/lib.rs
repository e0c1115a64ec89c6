//! Core library for the CEP weather services.
//!
//! This crate defines:
//! - CEP validation and temperature conversion
//! - Abstraction over the city and weather lookup providers
//! - Shared domain models (requests, responses, error bodies)
//! - Environment-driven configuration and telemetry setup
//!
//! It is used by `cep-gateway` and `cep-resolver`, but can also be reused by
//! other binaries or services.

pub mod cep;
pub mod config;
pub mod model;
pub mod provider;
pub mod telemetry;
pub mod temperature;

pub use cep::is_valid_cep;
pub use config::{GatewayConfig, ResolverConfig};
pub use model::{CepRequest, ErrorBody, ResolvedCity, WeatherReport};
pub use provider::{CityLookupError, CityResolver, TemperatureSource, WeatherLookupError};
pub use temperature::{celsius_to_fahrenheit, celsius_to_kelvin};
