use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{Instrument, Span, field, info_span};

use crate::model::ResolvedCity;
use crate::provider::{CityLookupError, CityResolver, LOOKUP_TIMEOUT};

/// CEP → locality lookup against ViaCEP.
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    base_url: String,
    http: Client,
}

impl ViaCepProvider {
    pub fn new(base_url: String) -> Self {
        let http = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self { base_url, http }
    }

    async fn fetch(&self, cep: &str) -> Result<ViaCepResponse> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to ViaCEP")?;

        let body = res.text().await.context("Failed to read ViaCEP response body")?;

        serde_json::from_str(&body).context("Failed to parse ViaCEP JSON")
    }
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: bool,
}

#[async_trait]
impl CityResolver for ViaCepProvider {
    async fn resolve(&self, cep: &str) -> Result<ResolvedCity, CityLookupError> {
        let span = info_span!(
            "viacep-lookup",
            cep = %cep,
            city = field::Empty,
            state = field::Empty,
            cep.not_found = field::Empty,
        );

        async move {
            let parsed = match self.fetch(cep).await {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::error!(error = %err, "ViaCEP lookup failed");
                    return Err(CityLookupError::Upstream(err));
                }
            };

            if parsed.erro {
                // Expected outcome, not a fault: flag it, no error event.
                Span::current().record("cep.not_found", true);
                return Err(CityLookupError::NotFound);
            }

            Span::current().record("city", parsed.localidade.as_str());
            Span::current().record("state", parsed.uf.as_str());

            Ok(ResolvedCity { city: parsed.localidade, region: parsed.uf })
        }
        .instrument(span)
        .await
    }
}
