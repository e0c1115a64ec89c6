//! The `/weather` handler: validate, resolve city, fetch temperature,
//! convert, and map each failure class to its status code.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use cep_core::{
    CepRequest, CityLookupError, CityResolver, ErrorBody, ResolverConfig, TemperatureSource,
    WeatherLookupError, WeatherReport, celsius_to_fahrenheit, celsius_to_kelvin, is_valid_cep,
    provider::{ViaCepProvider, WeatherApiProvider},
};
use opentelemetry_http::HeaderExtractor;
use tracing::{Instrument, Span, field, info_span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Clone)]
pub struct AppState {
    city: Arc<dyn CityResolver>,
    weather: Arc<dyn TemperatureSource>,
}

impl AppState {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            city: Arc::new(ViaCepProvider::new(config.viacep_base_url.clone())),
            weather: Arc::new(WeatherApiProvider::new(
                config.weatherapi_base_url.clone(),
                config.weatherapi_key.clone(),
            )),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/weather", post(handle_weather)).with_state(state)
}

/// The `weather-endpoint` span covers the whole handler. It joins the
/// gateway's trace when context headers arrive and is a root span when the
/// service is called directly.
async fn handle_weather(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let parent = opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(&headers))
    });

    let span = info_span!(
        "weather-endpoint",
        cep = field::Empty,
        response.city = field::Empty,
        response.temp_c = field::Empty,
        response.temp_f = field::Empty,
        response.temp_k = field::Empty,
    );
    span.set_parent(parent);

    async move {
        let request: CepRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(err) => {
                tracing::error!(error = %err, "failed to decode request body");
                return invalid_zipcode();
            }
        };

        if !is_valid_cep(&request.cep) {
            return invalid_zipcode();
        }

        Span::current().record("cep", request.cep.as_str());

        let resolved = match state.city.resolve(&request.cep).await {
            Ok(resolved) => resolved,
            Err(CityLookupError::NotFound) => return zipcode_not_found(),
            Err(CityLookupError::Upstream(err)) => {
                tracing::error!(error = %err, "city lookup failed");
                return internal_server_error();
            }
        };

        let temp_c = match state.weather.current_celsius(&resolved.city).await {
            Ok(temp_c) => temp_c,
            Err(WeatherLookupError::CityNotFound) => return zipcode_not_found(),
            Err(err) => {
                tracing::error!(error = %err, "temperature lookup failed");
                return internal_server_error();
            }
        };

        let report = WeatherReport {
            city: resolved.city,
            temp_c,
            temp_f: celsius_to_fahrenheit(temp_c),
            temp_k: celsius_to_kelvin(temp_c),
        };

        let span = Span::current();
        span.record("response.city", report.city.as_str());
        span.record("response.temp_c", report.temp_c);
        span.record("response.temp_f", report.temp_f);
        span.record("response.temp_k", report.temp_k);

        (StatusCode::OK, Json(report)).into_response()
    }
    .instrument(span)
    .await
}

fn invalid_zipcode() -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody::invalid_zipcode())).into_response()
}

fn zipcode_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::zipcode_not_found())).into_response()
}

fn internal_server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal_server_error())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header::CONTENT_TYPE};
    use cep_core::ResolvedCity;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StaticCity(&'static str);

    #[async_trait]
    impl CityResolver for StaticCity {
        async fn resolve(&self, _cep: &str) -> Result<ResolvedCity, CityLookupError> {
            Ok(ResolvedCity { city: self.0.to_string(), region: "SP".to_string() })
        }
    }

    #[derive(Debug)]
    struct UnknownCep;

    #[async_trait]
    impl CityResolver for UnknownCep {
        async fn resolve(&self, _cep: &str) -> Result<ResolvedCity, CityLookupError> {
            Err(CityLookupError::NotFound)
        }
    }

    #[derive(Debug)]
    struct BrokenCityLookup;

    #[async_trait]
    impl CityResolver for BrokenCityLookup {
        async fn resolve(&self, _cep: &str) -> Result<ResolvedCity, CityLookupError> {
            Err(CityLookupError::Upstream(anyhow!("connection reset")))
        }
    }

    #[derive(Debug)]
    struct StaticTemp(f64);

    #[async_trait]
    impl TemperatureSource for StaticTemp {
        async fn current_celsius(&self, _city: &str) -> Result<f64, WeatherLookupError> {
            Ok(self.0)
        }
    }

    #[derive(Debug)]
    struct UnknownCity;

    #[async_trait]
    impl TemperatureSource for UnknownCity {
        async fn current_celsius(&self, _city: &str) -> Result<f64, WeatherLookupError> {
            Err(WeatherLookupError::CityNotFound)
        }
    }

    #[derive(Debug)]
    struct NoApiKey;

    #[async_trait]
    impl TemperatureSource for NoApiKey {
        async fn current_celsius(&self, _city: &str) -> Result<f64, WeatherLookupError> {
            Err(WeatherLookupError::MissingApiKey)
        }
    }

    fn app(city: impl CityResolver + 'static, weather: impl TemperatureSource + 'static) -> Router {
        router(AppState { city: Arc::new(city), weather: Arc::new(weather) })
    }

    async fn post_weather(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/weather")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn returns_city_and_all_three_scales() {
        let app = app(StaticCity("São Paulo"), StaticTemp(28.5));
        let (status, body) = post_weather(app, r#"{"cep":"29902555"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "São Paulo");
        assert_eq!(body["temp_C"].as_f64().unwrap(), 28.5);
        assert_eq!(body["temp_F"].as_f64().unwrap(), celsius_to_fahrenheit(28.5));
        assert_eq!(body["temp_K"].as_f64().unwrap(), 301.5);
    }

    #[tokio::test]
    async fn short_cep_is_invalid() {
        let app = app(StaticCity("São Paulo"), StaticTemp(28.5));
        let (status, body) = post_weather(app, r#"{"cep":"123"}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, serde_json::json!({"message": "invalid zipcode"}));
    }

    #[tokio::test]
    async fn undecodable_body_is_invalid() {
        let app = app(StaticCity("São Paulo"), StaticTemp(28.5));
        let (status, body) = post_weather(app, r#"{"cep": 12345678}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, serde_json::json!({"message": "invalid zipcode"}));
    }

    #[tokio::test]
    async fn unknown_cep_maps_to_not_found() {
        let app = app(UnknownCep, StaticTemp(28.5));
        let (status, body) = post_weather(app, r#"{"cep":"00000000"}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"message": "can not find zipcode"}));
    }

    #[tokio::test]
    async fn city_unknown_to_weather_provider_maps_to_not_found() {
        let app = app(StaticCity("Nowhere"), UnknownCity);
        let (status, body) = post_weather(app, r#"{"cep":"29902555"}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"message": "can not find zipcode"}));
    }

    #[tokio::test]
    async fn city_lookup_failure_maps_to_internal_server_error() {
        let app = app(BrokenCityLookup, StaticTemp(28.5));
        let (status, body) = post_weather(app, r#"{"cep":"29902555"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"message": "internal server error"}));
    }

    #[tokio::test]
    async fn missing_api_key_maps_to_internal_server_error() {
        let app = app(StaticCity("São Paulo"), NoApiKey);
        let (status, body) = post_weather(app, r#"{"cep":"29902555"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"message": "internal server error"}));
    }

    #[tokio::test]
    async fn identical_input_yields_identical_bodies() {
        let (_, first) =
            post_weather(app(StaticCity("São Paulo"), StaticTemp(28.5)), r#"{"cep":"29902555"}"#)
                .await;
        let (_, second) =
            post_weather(app(StaticCity("São Paulo"), StaticTemp(28.5)), r#"{"cep":"29902555"}"#)
                .await;

        assert_eq!(first, second);
    }
}
