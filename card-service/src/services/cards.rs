//! Card creation and confirmation.
//!
//! Create runs the art and message pipelines concurrently and joins both.
//! Confirm validates the address, copies the artwork to the image store and
//! hands the email to a detached dispatch task.

use super::art::ArtFinalizer;
use super::dispatcher::EmailDispatcher;
use super::formatter::{format_to_html, sanitize_message_html};
use super::message::MessageFinalizer;
use super::providers::{ImageStore, ProviderError};
use crate::models::{CardRequest, CardResult, ConfirmRequest};
use crate::utils::is_valid_email;
use metrics::counter;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome of a confirmation request.
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// Image stored and email handed off. Delivery is not awaited; the
    /// handle is exposed for callers that want to observe it.
    Sent {
        hosted_url: String,
        dispatch: JoinHandle<()>,
    },
    /// The address failed validation; nothing was uploaded or sent.
    InvalidEmail,
    /// The image could not be stored; no email was sent.
    UploadFailed(ProviderError),
}

/// Store file name for an image: hex SHA-512 of its source URL.
pub fn image_file_name(source_url: &str) -> String {
    let digest = Sha512::digest(source_url.as_bytes());
    format!("{}.png", hex::encode(digest))
}

pub struct CardService {
    art: ArtFinalizer,
    message: MessageFinalizer,
    store: Arc<dyn ImageStore>,
    dispatcher: Arc<EmailDispatcher>,
}

impl CardService {
    pub fn new(
        art: ArtFinalizer,
        message: MessageFinalizer,
        store: Arc<dyn ImageStore>,
        dispatcher: Arc<EmailDispatcher>,
    ) -> Self {
        Self {
            art,
            message,
            store,
            dispatcher,
        }
    }

    /// Generate a card. Waits for both pipelines; fails only if the message
    /// could not be written.
    pub async fn create(&self, request: &CardRequest) -> Result<CardResult, ProviderError> {
        tracing::info!(
            art_theme = %request.art_theme,
            message_theme = %request.message_theme,
            anonymous = request.is_anonymous(),
            "New card request"
        );

        let (image_url, message) = tokio::join!(
            self.art.finalize(&request.art_theme),
            self.message.finalize(
                &request.message_theme,
                &request.recipient_name,
                &request.sender_name,
            )
        );

        let message = message.map_err(|e| {
            counter!("cards_created_total", "status" => "failed").increment(1);
            tracing::error!(error = %e, "Card message generation failed");
            e
        })?;

        let message_html = format_to_html(&message);

        counter!("cards_created_total", "status" => "created").increment(1);
        tracing::info!(
            image_url = %image_url,
            message = %message_html,
            "Card created"
        );

        Ok(CardResult {
            image_url,
            message_html,
        })
    }

    /// Store the shown image and email the card.
    pub async fn confirm(&self, request: ConfirmRequest) -> ConfirmOutcome {
        let email = request.email.to_lowercase();

        if !is_valid_email(&email) {
            counter!("cards_confirmed_total", "status" => "invalid_email").increment(1);
            tracing::warn!("Card confirmation rejected: invalid email address");
            return ConfirmOutcome::InvalidEmail;
        }

        tracing::info!(email = %email, "Card send requested");

        let file_name = image_file_name(&request.image_url);
        let hosted_url = match self
            .store
            .upload_from_url(&request.image_url, &file_name)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                counter!("cards_confirmed_total", "status" => "upload_failed").increment(1);
                tracing::error!(error = %e, source = %request.image_url, "Image upload failed");
                return ConfirmOutcome::UploadFailed(e);
            }
        };

        tracing::info!(hosted_url = %hosted_url, "Card image saved");

        let message_html = sanitize_message_html(&request.message_html);
        let dispatch = self
            .dispatcher
            .dispatch_detached(email, hosted_url.clone(), message_html);

        counter!("cards_confirmed_total", "status" => "sent").increment(1);

        ConfirmOutcome::Sent {
            hosted_url,
            dispatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{
        MockEmailProvider, MockImageProvider, MockImageStore, MockTextProvider,
    };

    struct Fixture {
        text: Arc<MockTextProvider>,
        store: Arc<MockImageStore>,
        mailer: Arc<MockEmailProvider>,
        service: CardService,
    }

    fn fixture(text: MockTextProvider, store_enabled: bool) -> Fixture {
        let text = Arc::new(text);
        let store = Arc::new(MockImageStore::new(store_enabled));
        let mailer = Arc::new(MockEmailProvider::new(true));

        let service = CardService::new(
            ArtFinalizer::new(
                text.clone(),
                Arc::new(MockImageProvider::new(true)),
                "https://alphajot.com/images/example.png",
            ),
            MessageFinalizer::new(text.clone()),
            store.clone(),
            Arc::new(EmailDispatcher::new(text.clone(), mailer.clone())),
        );

        Fixture {
            text,
            store,
            mailer,
            service,
        }
    }

    fn card_request() -> CardRequest {
        CardRequest {
            art_theme: "christmas".to_string(),
            message_theme: "funny".to_string(),
            recipient_name: "Grandma".to_string(),
            sender_name: "Sam".to_string(),
        }
    }

    fn confirm_request(email: &str) -> ConfirmRequest {
        ConfirmRequest {
            email: email.to_string(),
            image_url: "https://images.example.com/generated/mock-card.png".to_string(),
            message_html: "<p>Hello</p>".to_string(),
        }
    }

    #[test]
    fn file_name_is_sha512_hex() {
        let name = image_file_name("https://img.example/a.png");
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 128 + 4);
        assert_eq!(name, image_file_name("https://img.example/a.png"));
        assert_ne!(name, image_file_name("https://img.example/b.png"));
        // sha512("") is a well-known vector
        assert!(image_file_name("").starts_with("cf83e1357eefb8bdf1542850d66d8007"));
    }

    #[tokio::test]
    async fn create_formats_message() {
        let f = fixture(MockTextProvider::new(true).with_reply("\n\nHello\n"), true);

        let result = f.service.create(&card_request()).await.unwrap();

        assert_eq!(result.image_url, "https://images.example.com/generated/mock-card.png");
        assert_eq!(result.message_html, "Hello<p>");
        assert_eq!(f.text.prompts().len(), 2);
    }

    #[tokio::test]
    async fn create_fails_when_message_fails() {
        let f = fixture(
            MockTextProvider::new(true).failing_on("greeting card to"),
            true,
        );

        let result = f.service.create(&card_request()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn confirm_rejects_invalid_email_without_side_effects() {
        let f = fixture(MockTextProvider::new(true), true);

        let outcome = f.service.confirm(confirm_request("not-an-email")).await;

        assert!(matches!(outcome, ConfirmOutcome::InvalidEmail));
        assert_eq!(f.store.upload_count(), 0);
        assert_eq!(f.mailer.send_count(), 0);
        assert!(f.text.prompts().is_empty());
    }

    #[tokio::test]
    async fn confirm_lowercases_and_sends() {
        let f = fixture(MockTextProvider::new(true).with_reply("Happy Holidays"), true);

        let outcome = f.service.confirm(confirm_request("Friend@Example.COM")).await;

        let ConfirmOutcome::Sent {
            hosted_url,
            dispatch,
        } = outcome
        else {
            panic!("expected the card to be sent");
        };
        dispatch.await.unwrap();

        let expected_name = image_file_name("https://images.example.com/generated/mock-card.png");
        assert_eq!(hosted_url, format!("https://ik.imagekit.io/mock/{}", expected_name));
        assert_eq!(f.store.uploads()[0].1, expected_name);

        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "friend@example.com");
        assert!(sent[0].body_html.contains(&expected_name));
    }

    #[tokio::test]
    async fn confirm_strips_injected_markup_from_email() {
        let f = fixture(MockTextProvider::new(true).with_reply("Hi"), true);
        let mut request = confirm_request("friend@example.com");
        request.message_html = "<p>Hello</p><img src=https://evil.example/x.png>".to_string();

        let ConfirmOutcome::Sent { dispatch, .. } = f.service.confirm(request).await else {
            panic!("expected the card to be sent");
        };
        dispatch.await.unwrap();

        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body_html.contains("<p><p>Hello</p>&lt;img"));
        assert!(!sent[0].body_html.contains("<img src=https://evil.example"));
    }

    #[tokio::test]
    async fn confirm_stops_when_upload_fails() {
        let f = fixture(MockTextProvider::new(true), false);

        let outcome = f.service.confirm(confirm_request("friend@example.com")).await;

        assert!(matches!(outcome, ConfirmOutcome::UploadFailed(_)));
        assert_eq!(f.store.upload_count(), 1);
        assert_eq!(f.mailer.send_count(), 0);
    }
}
