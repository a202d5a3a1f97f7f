//! Generative language API client
//!
//! Endpoint: POST {base_url}/models/{model}:generateContent

use crate::config::GeminiConfig;
use crate::errors::{AdvisorError, Result};
use crate::gemini::types::{GenerationRequest, WireRequest, WireResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Anything that turns a [`GenerationRequest`] into raw response text.
///
/// Schema conformance and retries are the caller's job.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Model identifier, for logging
    fn model(&self) -> &str;

    /// Issue one generation call and return the raw text
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// reqwest-backed client for the Gemini `generateContent` API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create client from configuration
    pub fn with_config(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(AdvisorError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Check that the API is reachable with the configured key
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);

        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = WireRequest::from(request);
        debug!(model = %self.model, turns = body.contents.len(), "sending generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisorError::GenerationApi(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisorError::GenerationApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::GenerationApi(format!("Failed to parse response: {}", e)))?;

        if let Some(reason) = wire.block_reason() {
            return Err(AdvisorError::GenerationApi(format!("blocked: {}", reason)));
        }

        wire.first_text()
            .ok_or_else(|| AdvisorError::GenerationApi("empty response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_with_config() {
        let config = GeminiConfig {
            base_url: "http://localhost:8080/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            api_key: "k".to_string(),
            request_timeout_secs: 5,
        };
        let client = GeminiClient::with_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1beta");
        assert_eq!(client.model(), "gemini-test");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_client_default_config() {
        let client = GeminiClient::with_config(&GeminiConfig::default()).unwrap();
        assert_eq!(client.model(), "gemini-2.0-flash");
    }

    #[tokio::test]
    #[ignore] // Requires network access and GEMINI_API_KEY
    async fn test_health_check_integration() {
        let mut config = GeminiConfig::default();
        config.api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        let client = GeminiClient::with_config(&config).unwrap();
        assert!(client.health_check().await.unwrap());
    }
}
