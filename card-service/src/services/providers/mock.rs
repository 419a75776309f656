//! Mock provider implementations.
//!
//! Used when a collaborator is disabled in configuration (local development)
//! and by tests, which rely on the recorded calls and injectable failures.

use super::{
    DeliveryReceipt, EmailMessage, EmailProvider, GenerationParams, ImageParams, ImageProvider,
    ImageStore, ProviderError, TextProvider,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock completion provider.
///
/// Replies with a fixed text (or an echo of the prompt), records every prompt
/// it receives and can be told to fail or stall on prompts containing a
/// marker substring.
pub struct MockTextProvider {
    enabled: bool,
    reply: Option<String>,
    fail_on: Option<String>,
    delay_on: Option<(String, Duration)>,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            reply: None,
            fail_on: None,
            delay_on: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `reply`.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    /// Fail every prompt containing `marker`.
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_on = Some(marker.into());
        self
    }

    /// Sleep for `delay` before answering prompts containing `marker`.
    pub fn delayed_on(mut self, marker: impl Into<String>, delay: Duration) -> Self {
        self.delay_on = Some((marker.into(), delay));
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn complete(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        if let Some((marker, delay)) = &self.delay_on {
            if prompt.contains(marker.as_str()) {
                tokio::time::sleep(*delay).await;
            }
        }

        if let Some(marker) = &self.fail_on {
            if prompt.contains(marker.as_str()) {
                return Err(ProviderError::ApiError(format!(
                    "Mock failure for prompt containing '{}'",
                    marker
                )));
            }
        }

        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| format!("\n\nMock response for: {}", prompt)))
    }
}

/// Mock image generator.
pub struct MockImageProvider {
    enabled: bool,
    url: String,
    prompts: Mutex<Vec<String>>,
}

impl MockImageProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            url: "https://images.example.com/generated/mock-card.png".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, prompt: &str, _params: &ImageParams) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock image provider not enabled".to_string(),
            ));
        }

        Ok(self.url.clone())
    }
}

/// Mock image store returning a deterministic hosted URL.
pub struct MockImageStore {
    enabled: bool,
    upload_count: AtomicU64,
    uploads: Mutex<Vec<(String, String)>>,
}

impl MockImageStore {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            upload_count: AtomicU64::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn upload_count(&self) -> u64 {
        self.upload_count.load(Ordering::SeqCst)
    }

    /// `(source_url, file_name)` pairs received so far.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads
            .lock()
            .map(|uploads| uploads.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload_from_url(
        &self,
        source_url: &str,
        file_name: &str,
    ) -> Result<String, ProviderError> {
        self.upload_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push((source_url.to_string(), file_name.to_string()));
        }

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock image store not enabled".to_string(),
            ));
        }

        tracing::info!(
            source = %source_url,
            file_name = %file_name,
            "[MOCK] Image would be uploaded"
        );

        Ok(format!("https://ik.imagekit.io/mock/{}", file_name))
    }
}

/// Mock email provider for testing.
///
/// `send_count` and `sent` only cover delivered mail; `attempt_count` also
/// counts sends that failed.
pub struct MockEmailProvider {
    enabled: bool,
    fail_sends: bool,
    delay: Option<Duration>,
    attempt_count: AtomicU64,
    send_count: AtomicU64,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockEmailProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fail_sends: false,
            delay: None,
            attempt_count: AtomicU64::new(0),
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Stay enabled but reject every send, like an unreachable relay.
    pub fn failing(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Sleep for `delay` before each send completes.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn attempt_count(&self) -> u64 {
        self.attempt_count.load(Ordering::SeqCst)
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &EmailMessage) -> Result<DeliveryReceipt, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock email provider is not enabled".to_string(),
            ));
        }

        self.attempt_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_sends {
            return Err(ProviderError::SendFailed(
                "Mock SMTP relay refused the message".to_string(),
            ));
        }

        let count = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "[MOCK] Email would be sent"
        );

        Ok(DeliveryReceipt {
            provider_id: Some(format!("mock-email-{}", count)),
        })
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
