use super::formatter::ATTRIBUTION;
use super::prompts;
use super::providers::{DeliveryReceipt, EmailMessage, EmailProvider, ProviderError, TextProvider};
use askama::Template;
use metrics::counter;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Template)]
#[template(path = "email.html")]
struct CardEmailTemplate<'a> {
    image_url: &'a str,
    message_html: &'a str,
    attribution: &'a str,
}

/// Composes and sends the card email.
pub struct EmailDispatcher {
    text: Arc<dyn TextProvider>,
    mailer: Arc<dyn EmailProvider>,
}

impl EmailDispatcher {
    pub fn new(text: Arc<dyn TextProvider>, mailer: Arc<dyn EmailProvider>) -> Self {
        Self { text, mailer }
    }

    /// Ask the completion service for a subject line, falling back to a
    /// fixed greeting on failure or an empty answer.
    pub async fn generate_subject(&self, message_html: &str) -> String {
        match self
            .text
            .complete(&prompts::subject_prompt(message_html), &prompts::subject_params())
            .await
        {
            Ok(subject) if !subject.trim().is_empty() => {
                let subject = subject.trim().to_string();
                tracing::info!(subject = %subject, "Generated email subject");
                subject
            }
            Ok(_) => {
                tracing::warn!("Subject generation returned empty text, using fallback");
                prompts::FALLBACK_SUBJECT.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Subject generation failed, using fallback");
                counter!("card_fallbacks_total", "stage" => "subject").increment(1);
                prompts::FALLBACK_SUBJECT.to_string()
            }
        }
    }

    pub fn compose_body(&self, image_url: &str, message_html: &str) -> Result<String, ProviderError> {
        CardEmailTemplate {
            image_url,
            message_html,
            attribution: ATTRIBUTION,
        }
        .render()
        .map_err(|e| ProviderError::SendFailed(format!("Failed to render email body: {}", e)))
    }

    /// Build the card email and hand it to the mail transport.
    pub async fn send(
        &self,
        email: &str,
        image_url: &str,
        message_html: &str,
    ) -> Result<DeliveryReceipt, ProviderError> {
        if !self.mailer.is_enabled() {
            return Err(ProviderError::NotConfigured(
                "Mail transport is disabled".to_string(),
            ));
        }

        let subject = self.generate_subject(message_html).await;
        let body_html = self.compose_body(image_url, message_html)?;

        self.mailer
            .send(&EmailMessage {
                to: email.to_string(),
                subject,
                body_html,
            })
            .await
    }

    /// Send in a detached task. The outcome is only logged and counted; the
    /// caller does not wait for delivery.
    pub fn dispatch_detached(
        self: &Arc<Self>,
        email: String,
        image_url: String,
        message_html: String,
    ) -> JoinHandle<()> {
        let dispatcher = Arc::clone(self);

        tokio::spawn(async move {
            match dispatcher.send(&email, &image_url, &message_html).await {
                Ok(receipt) => {
                    counter!("emails_dispatched_total", "status" => "sent").increment(1);
                    tracing::info!(
                        to = %email,
                        provider_id = receipt.provider_id.as_deref().unwrap_or("-"),
                        "Card email sent successfully"
                    );
                }
                Err(e) => {
                    counter!("emails_dispatched_total", "status" => "failed").increment(1);
                    tracing::error!(to = %email, error = %e, "Card email dispatch failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{MockEmailProvider, MockTextProvider};

    #[tokio::test]
    async fn subject_is_trimmed_completion() {
        let text = Arc::new(MockTextProvider::new(true).with_reply("\n\n Season's Greetings, Sam! "));
        let dispatcher = EmailDispatcher::new(text, Arc::new(MockEmailProvider::new(true)));

        assert_eq!(
            dispatcher.generate_subject("<p>Hi</p>").await,
            "Season's Greetings, Sam!"
        );
    }

    #[tokio::test]
    async fn subject_falls_back_on_failure() {
        let text = Arc::new(MockTextProvider::new(false));
        let dispatcher = EmailDispatcher::new(text, Arc::new(MockEmailProvider::new(true)));

        assert_eq!(
            dispatcher.generate_subject("<p>Hi</p>").await,
            prompts::FALLBACK_SUBJECT
        );
    }

    #[tokio::test]
    async fn subject_falls_back_on_blank_completion() {
        let text = Arc::new(MockTextProvider::new(true).with_reply("\n \n"));
        let dispatcher = EmailDispatcher::new(text, Arc::new(MockEmailProvider::new(true)));

        assert_eq!(
            dispatcher.generate_subject("<p>Hi</p>").await,
            "Merry Christmas!"
        );
    }

    #[test]
    fn body_embeds_image_and_message() {
        let dispatcher = EmailDispatcher::new(
            Arc::new(MockTextProvider::new(true)),
            Arc::new(MockEmailProvider::new(true)),
        );

        let body = dispatcher
            .compose_body("https://ik.imagekit.io/mock/card.png", "<p>Hello</p>")
            .unwrap();

        assert!(body.starts_with("<html><body>"));
        assert!(body.contains("<p><p>Hello</p></p>"));
        assert!(body.contains("ik.imagekit.io"));
        assert!(body.contains(ATTRIBUTION));
        assert!(body.contains("box-shadow: 0px 5px 15px #666666;"));
    }

    #[tokio::test]
    async fn detached_dispatch_delivers_mail() {
        let mailer = Arc::new(MockEmailProvider::new(true));
        let dispatcher = Arc::new(EmailDispatcher::new(
            Arc::new(MockTextProvider::new(true).with_reply("Happy Holidays")),
            mailer.clone(),
        ));

        dispatcher
            .dispatch_detached(
                "friend@example.com".to_string(),
                "https://ik.imagekit.io/mock/card.png".to_string(),
                "<p>Hello</p>".to_string(),
            )
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "friend@example.com");
        assert_eq!(sent[0].subject, "Happy Holidays");
    }

    #[tokio::test]
    async fn detached_dispatch_swallows_transport_errors() {
        let mailer = Arc::new(MockEmailProvider::new(true).failing());
        let dispatcher = Arc::new(EmailDispatcher::new(
            Arc::new(MockTextProvider::new(true)),
            mailer.clone(),
        ));

        let handle = dispatcher.dispatch_detached(
            "friend@example.com".to_string(),
            "https://ik.imagekit.io/mock/card.png".to_string(),
            "<p>Hello</p>".to_string(),
        );

        assert!(handle.await.is_ok());
        assert_eq!(mailer.attempt_count(), 1);
        assert_eq!(mailer.send_count(), 0);
    }

    #[tokio::test]
    async fn disabled_transport_skips_subject_generation() {
        let text = Arc::new(MockTextProvider::new(true));
        let dispatcher =
            EmailDispatcher::new(text.clone(), Arc::new(MockEmailProvider::new(false)));

        let result = dispatcher
            .send("friend@example.com", "https://ik.imagekit.io/mock/card.png", "<p>Hi</p>")
            .await;

        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
        assert!(text.prompts().is_empty());
    }
}
