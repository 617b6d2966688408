use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{InputMessage, ResponsesRequest, Tool};

const API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("OPENAI_API_KEY not set")]
    ApiKeyNotSet,

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// A model endpoint that runs web search for a prepared conversation.
/// Implemented by `OpenAiClient` for production; mock implementations used in tests.
pub trait ModelProvider {
    /// Send the conversation and return the raw response body of a 2xx reply.
    async fn create_response(&self, input: Vec<InputMessage>) -> Result<String, ProviderError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(http: Client, api_key: &str, model: &str) -> Result<Self, ProviderError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ProviderError::ApiKeyNotSet);
        }
        let model = match model.trim() {
            "" => DEFAULT_MODEL,
            m => m,
        };
        Ok(Self {
            http,
            api_key: ApiKey(api_key.to_string()),
            model: model.to_string(),
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ModelProvider for OpenAiClient {
    async fn create_response(&self, input: Vec<InputMessage>) -> Result<String, ProviderError> {
        let url = format!("{}/responses", self.base_url);

        let request = ResponsesRequest {
            model: &self.model,
            input,
            tools: vec![Tool::WebSearchPreview],
            temperature: TEMPERATURE,
        };

        debug_assert!(
            url.starts_with("https://") || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key.0)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "provider request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let end = text.floor_char_boundary(200);
            warn!(status = %status, body = &text[..end], "provider returned error status");
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(model = %self.model, bytes = body.len(), "provider response received");
        Ok(body)
    }
}
