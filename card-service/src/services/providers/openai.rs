//! OpenAI provider implementation.
//!
//! Text comes from the legacy completions endpoint (`/v1/completions`), art
//! from the images endpoint (`/v1/images/generations`). Completion and image
//! calls may use different API keys.

use super::{GenerationParams, ImageParams, ImageProvider, ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub image_api_key: String,
    pub completion_model: String,
    pub timeout: Duration,
}

/// Client for the OpenAI completion and image APIs.
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Map a non-success status into a provider error.
    async fn error_for_status(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            return ProviderError::RateLimited;
        }

        ProviderError::ApiError(format!("OpenAI API error {}: {}", status, error_text))
    }
}

#[async_trait]
impl TextProvider for OpenAiClient {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = CompletionRequest {
            model: &self.config.completion_model,
            prompt,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
        };

        tracing::debug!(
            model = %self.config.completion_model,
            prompt_len = prompt.len(),
            max_tokens = params.max_tokens,
            "Sending completion request to OpenAI"
        );

        let response = self
            .client
            .traced_post(&self.api_url("completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let api_response: CompletionResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse completion: {}", e))
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| ProviderError::InvalidResponse("Completion had no choices".to_string()))
    }
}

#[async_trait]
impl ImageProvider for OpenAiClient {
    async fn generate(&self, prompt: &str, params: &ImageParams) -> Result<String, ProviderError> {
        let request = ImageRequest {
            prompt,
            n: params.count,
            size: &params.size,
        };

        tracing::debug!(
            prompt_len = prompt.len(),
            size = %params.size,
            "Sending image generation request to OpenAI"
        );

        let response = self
            .client
            .traced_post(&self.api_url("images/generations"))
            .bearer_auth(&self.config.image_api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let api_response: ImageResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse image response: {}", e))
        })?;

        api_response
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| ProviderError::InvalidResponse("Image response had no URL".to_string()))
    }
}

// ============================================================================
// OpenAI API types
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}
