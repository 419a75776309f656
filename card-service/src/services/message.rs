use super::prompts;
use super::providers::{ProviderError, TextProvider};
use std::sync::Arc;

/// Writes the greeting text for a card.
///
/// Unlike the art pipeline there is no fallback here: a completion failure is
/// returned to the caller and fails the whole card request.
pub struct MessageFinalizer {
    text: Arc<dyn TextProvider>,
}

impl MessageFinalizer {
    pub fn new(text: Arc<dyn TextProvider>) -> Self {
        Self { text }
    }

    pub async fn finalize(
        &self,
        theme: &str,
        recipient: &str,
        sender: &str,
    ) -> Result<String, ProviderError> {
        let prompt = prompts::message_prompt(theme, recipient, sender);
        tracing::info!(prompt = %prompt, "Requesting card message");

        let message = self
            .text
            .complete(&prompt, &prompts::creative_params())
            .await?;

        Ok(message.trim_start_matches('\n').to_string())
    }
}
