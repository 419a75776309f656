//! External collaborator abstractions and implementations.
//!
//! Every hosted API the card flow depends on sits behind a trait so the
//! orchestration can be exercised against mocks: text completion and image
//! generation (OpenAI), image hosting (ImageKit) and mail delivery (SMTP).

pub mod email;
pub mod imagekit;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use email::SmtpProvider;
pub use imagekit::ImageKitStore;
pub use mock::{MockEmailProvider, MockImageProvider, MockImageStore, MockTextProvider};
pub use openai::OpenAiClient;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Send error: {0}")]
    SendFailed(String),
}

/// Sampling parameters for a completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: f32,

    /// Maximum output tokens.
    pub max_tokens: u32,

    /// Top-p sampling.
    pub top_p: f32,

    pub frequency_penalty: f32,

    pub presence_penalty: f32,
}

impl GenerationParams {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Parameters for an image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageParams {
    /// Number of images to generate.
    pub count: u8,

    /// Image dimensions, e.g. `512x512`.
    pub size: String,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            count: 1,
            size: "512x512".to_string(),
        }
    }
}

/// An outbound email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_html: String,
}

/// Delivery receipt from a mail provider.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub provider_id: Option<String>,
}

/// Text completion (prompt in, generated text out).
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn complete(&self, prompt: &str, params: &GenerationParams)
        -> Result<String, ProviderError>;
}

/// Image generation (prompt in, short-lived image URL out).
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str, params: &ImageParams) -> Result<String, ProviderError>;
}

/// Hosted image storage.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Copy the image at `source_url` into the store under `file_name` and
    /// return its permanent URL.
    async fn upload_from_url(&self, source_url: &str, file_name: &str)
        -> Result<String, ProviderError>;
}

/// Outbound mail transport.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<DeliveryReceipt, ProviderError>;
    fn is_enabled(&self) -> bool;
}
