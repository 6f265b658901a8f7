//! HTTP client for the external prediction endpoint.
//!
//! One request per submission: no retry, no timeout, no cancellation.

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::errors::{ScreenError, ScreenResult};
use crate::form::FormPayload;
use crate::prediction::PredictionResult;

/// Path of the prediction route, relative to the base URL
pub const PREDICT_PATH: &str = "/predict";

/// Thin wrapper over a shared `reqwest::Client`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    /// Client for `{base_url}/predict`
    pub fn new(base_url: &str) -> ScreenResult<Self> {
        let base = base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ScreenError::invalid_input(
                "endpoint",
                base_url,
                "Prediction endpoint must not be empty",
            ));
        }

        // The browser sets its own user agent on WASM
        #[cfg(not(target_arch = "wasm32"))]
        let builder = reqwest::Client::builder()
            .user_agent(format!("LepraScreen/{}", env!("CARGO_PKG_VERSION")));
        #[cfg(target_arch = "wasm32")]
        let builder = reqwest::Client::builder();

        let http = builder
            .build()
            .map_err(|e| ScreenError::request_failed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(PredictionClient {
            http,
            endpoint: format!("{}{}", base, PREDICT_PATH),
        })
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the form payload as JSON and parse the prediction
    pub async fn predict(&self, payload: &FormPayload) -> ScreenResult<PredictionResult> {
        tracing::debug!(endpoint = %self.endpoint, fields = payload.len(), "sending prediction request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| ScreenError::request_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScreenError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScreenError::request_failed(e.to_string()))?;

        serde_json::from_slice::<PredictionResult>(&body)
            .map_err(|e| ScreenError::malformed_response(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_predict_path() {
        let client = PredictionClient::new("http://localhost:10000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:10000/predict");
    }

    #[test]
    fn test_empty_base_rejected() {
        let err = PredictionClient::new("  ").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
