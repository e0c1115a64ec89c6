use serde::{Deserialize, Serialize};

/// Inbound body for both `POST /cep` and `POST /weather`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CepRequest {
    pub cep: String,
}

/// Terminal success response of the resolver service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

/// Locality resolved from a CEP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCity {
    pub city: String,
    /// Federative unit, e.g. "SP".
    pub region: String,
}

/// Error body with one of a fixed vocabulary of messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn invalid_zipcode() -> Self {
        Self { message: "invalid zipcode".to_string() }
    }

    pub fn zipcode_not_found() -> Self {
        Self { message: "can not find zipcode".to_string() }
    }

    pub fn internal_server_error() -> Self {
        Self { message: "internal server error".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_report_uses_capitalised_wire_names() {
        let report = WeatherReport {
            city: "São Paulo".to_string(),
            temp_c: 28.5,
            temp_f: 83.3,
            temp_k: 301.5,
        };

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "city": "São Paulo",
                "temp_C": 28.5,
                "temp_F": 83.3,
                "temp_K": 301.5,
            })
        );
    }

    #[test]
    fn error_messages_match_the_fixed_vocabulary() {
        assert_eq!(ErrorBody::invalid_zipcode().message, "invalid zipcode");
        assert_eq!(ErrorBody::zipcode_not_found().message, "can not find zipcode");
        assert_eq!(ErrorBody::internal_server_error().message, "internal server error");
    }
}
