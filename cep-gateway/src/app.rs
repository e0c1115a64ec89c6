//! The `/cep` handler: validate, forward to the resolver, relay verbatim.

use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use cep_core::{CepRequest, ErrorBody, GatewayConfig, is_valid_cep};
use opentelemetry_http::HeaderInjector;
use reqwest::Client;
use tracing::{Instrument, Span, field, info_span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AppState {
    http: Client,
    resolver_url: String,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> Self {
        let http = Client::builder()
            .timeout(FORWARD_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self { http, resolver_url: config.resolver_url.clone() }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/cep", post(handle_cep)).with_state(state)
}

/// Linear pipeline: decode, validate, forward, relay. The `validate-cep`
/// span covers the whole handler; `call-service-b` nests inside it and
/// covers only the network hop.
async fn handle_cep(State(state): State<AppState>, body: Bytes) -> Response {
    let span = info_span!("validate-cep", cep = field::Empty);

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

        let call_span = info_span!("call-service-b", http.status_code = field::Empty);
        forward(&state, &request).instrument(call_span).await
    }
    .instrument(span)
    .await
}

/// POST the request to the resolver, carrying the current trace context in
/// the headers so the resolver's spans join this trace.
async fn forward(state: &AppState, request: &CepRequest) -> Response {
    let context = Span::current().context();
    let mut headers = HeaderMap::new();
    opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&context, &mut HeaderInjector(&mut headers));
    });

    let sent = state
        .http
        .post(&state.resolver_url)
        .headers(headers)
        .json(request)
        .send()
        .await;

    let response = match sent {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "call to resolver service failed");
            return internal_server_error();
        }
    };

    let status = response.status();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => {
            tracing::error!(error = %err, "failed to read resolver response body");
            return internal_server_error();
        }
    };

    Span::current().record("http.status_code", i64::from(status.as_u16()));

    // Verbatim relay: status and body pass through byte-for-byte, the
    // gateway never re-interprets the resolver's payload.
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

fn invalid_zipcode() -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody::invalid_zipcode())).into_response()
}

fn internal_server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal_server_error())).into_response()
}
