use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{Instrument, Span, field, info_span};

use crate::provider::{LOOKUP_TIMEOUT, TemperatureSource, WeatherLookupError};

/// WeatherAPI.com error code for "no matching location found".
const ERROR_CODE_NO_LOCATION: i64 = 1006;

/// City → current temperature lookup against WeatherAPI.com.
///
/// The API key is optional at construction so the process can start without
/// it; every lookup then fails before any network call is made.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let http = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self { base_url, api_key, http }
    }

    async fn fetch_current(&self, city: &str) -> Result<f64, WeatherLookupError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(WeatherLookupError::MissingApiKey);
        };

        let url = format!("{}/v1/current.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", api_key), ("q", city), ("aqi", "no")])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com")?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(WeatherLookupError::Auth(status.as_u16()));
        }

        let body = res.text().await.context("Failed to read WeatherAPI response body")?;

        // WeatherAPI embeds errors as a JSON object rather than relying on
        // the status code, so the body is parsed regardless of status.
        let parsed: WaResponse =
            serde_json::from_str(&body).context("Failed to parse WeatherAPI JSON")?;

        if let Some(error) = parsed.error {
            if error.code == ERROR_CODE_NO_LOCATION {
                return Err(WeatherLookupError::CityNotFound);
            }
            return Err(WeatherLookupError::Upstream(anyhow!(
                "WeatherAPI error {}: {}",
                error.code,
                error.message,
            )));
        }

        let current = parsed
            .current
            .ok_or_else(|| anyhow!("WeatherAPI response contained no current conditions"))?;

        Ok(current.temp_c)
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: Option<WaCurrent>,
    error: Option<WaError>,
}

#[async_trait]
impl TemperatureSource for WeatherApiProvider {
    async fn current_celsius(&self, city: &str) -> Result<f64, WeatherLookupError> {
        let span = info_span!(
            "weather-lookup",
            city = %city,
            temperature.celsius = field::Empty,
        );

        async move {
            match self.fetch_current(city).await {
                Ok(temp_c) => {
                    Span::current().record("temperature.celsius", temp_c);
                    Ok(temp_c)
                }
                Err(err) => {
                    tracing::error!(error = %err, "weather lookup failed");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
