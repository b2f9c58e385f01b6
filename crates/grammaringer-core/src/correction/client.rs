use crate::{
    CoreResult, CorrectionError, CorrectionRequest, CorrectionResult, ServiceSettings,
    TextCorrector,
    correction::response::{parse_envelope, parse_inner_payload},
};

use std::{panic::Location, time::Instant};

use error_location::ErrorLocation;
use reqwest::{
    Client, StatusCode,
    header::{CONTENT_TYPE, HeaderValue},
};
use tracing::{debug, info, instrument, warn};

const API_KEY_HEADER: &str = "x-api-key";
const API_VERSION_HEADER: &str = "anthropic-version";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Longest body excerpt included in a non-200 error.
const ERROR_BODY_EXCERPT: usize = 512;

/// HTTP client for the text-correction service.
///
/// Holds a single connection-pooled [`reqwest::Client`]. Cloning is cheap and
/// shares the pool.
#[derive(Debug, Clone)]
pub struct CorrectionClient {
    http: Client,
    settings: ServiceSettings,
}

impl CorrectionClient {
    /// Build a client for the given service settings.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::ClientInit`] if the TLS backend cannot be
    /// initialized.
    #[track_caller]
    #[instrument(skip(settings), fields(endpoint = %settings.endpoint, model = %settings.model))]
    pub fn new(settings: ServiceSettings) -> CoreResult<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CorrectionError::ClientInit {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if settings.api_key().is_none() {
            warn!("No API key configured; corrections will fail until one is provided");
        }

        info!("CorrectionClient initialized");

        Ok(Self { http, settings })
    }

    /// Settings this client was built with.
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    async fn post(&self, request: &CorrectionRequest) -> CoreResult<String> {
        let api_key = self
            .settings
            .api_key()
            .ok_or_else(|| CorrectionError::MissingApiKey {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let body = request.to_wire(&self.settings.model, self.settings.max_tokens);

        let response = self
            .http
            .post(&self.settings.endpoint)
            .header(API_KEY_HEADER, api_key)
            .header(API_VERSION_HEADER, &self.settings.api_version)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .json(&body)
            .send()
            .await
            .map_err(|e| CorrectionError::TransportOrEnvelope {
                reason: format!("Request failed: {}", e),
                status: None,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| CorrectionError::TransportOrEnvelope {
                reason: format!("Failed to read response body: {}", e),
                status: Some(status.as_u16()),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if status != StatusCode::OK {
            return Err(CorrectionError::TransportOrEnvelope {
                reason: format!("Service returned {}: {}", status, excerpt(&payload)),
                status: Some(status.as_u16()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(body_len = payload.len(), "Envelope received");

        Ok(payload)
    }
}

impl TextCorrector for CorrectionClient {
    /// Send `prompt + " " + text` to the service and decode both response
    /// layers.
    ///
    /// # Errors
    ///
    /// - [`CorrectionError::MissingApiKey`] before any network activity.
    /// - [`CorrectionError::TransportOrEnvelope`] for network failures,
    ///   non-200 statuses and envelopes without a first text block.
    /// - [`CorrectionError::MalformedInnerPayload`] when the model output is
    ///   not a `{ result, comments }` object.
    #[instrument(skip(self, prompt, text), fields(text_len = text.len()))]
    async fn correct(&self, prompt: &str, text: &str) -> CoreResult<CorrectionResult> {
        let request = CorrectionRequest::new(prompt, text);
        let start = Instant::now();

        let payload = self.post(&request).await?;
        let raw = parse_envelope(&payload)?;
        let result = parse_inner_payload(&raw)?;

        info!(
            duration_ms = start.elapsed().as_millis(),
            result_len = result.corrected_text.len(),
            "Correction complete"
        );

        Ok(result)
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_EXCERPT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
