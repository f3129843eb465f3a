//! Anthropic Claude API provider implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, SiftError};
use crate::prompts;

use super::provider::{CompletionRequest, ProviderError, ReasoningProvider};

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

/// Provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Model to use.
    pub model: String,
    /// Maximum tokens in response.
    pub max_tokens: usize,
    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            temperature: 0.2,
        }
    }
}

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    config: ProviderConfig,
}

impl AnthropicProvider {
    /// Create a new provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ProviderConfig::default())
    }

    /// Create a new provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SiftError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable.
    ///
    /// A missing key is a startup-time configuration error, not a
    /// per-call failure.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            SiftError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| SiftError::Config(format!("invalid API key: {}", e)))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }
}

impl ReasoningProvider for AnthropicProvider {
    fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, ProviderError> {
        let content = format!(
            "{}\n\nData:\n{}",
            request.instruction,
            serde_json::to_string(&request.payload).unwrap_or_default()
        );

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": prompts::system_prompt(),
            "messages": [
                {
                    "role": "user",
                    "content": content
                }
            ]
        });

        let headers = self
            .build_headers()
            .map_err(|e| ProviderError::BadRequest(e.to_string()))?;

        let response = self
            .client
            .post(API_URL)
            .headers(headers)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Transient(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(classify_status(status, text));
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| ProviderError::Transient(format!("unreadable response body: {}", e)))?;

        api_response
            .content
            .into_iter()
            .find_map(|block| (block.content_type == "text").then_some(block.text))
            .ok_or_else(|| ProviderError::Transient("no text in API response".to_string()))
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Map an HTTP status to a retryability class.
fn classify_status(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            ProviderError::RateLimited(format!("API returned 429: {}", body))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::Auth(format!("API returned {}: {}", status, body))
        }
        s if s.is_client_error() => {
            ProviderError::BadRequest(format!("API returned {}: {}", status, body))
        }
        s => ProviderError::Transient(format!("API returned {}: {}", s, body)),
    }
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// Content block in API response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}
