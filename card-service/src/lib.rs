pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use crate::config::Settings;
use crate::services::providers::{
    EmailProvider, ImageKitStore, ImageProvider, ImageStore, MockEmailProvider,
    MockImageProvider, MockImageStore, MockTextProvider, OpenAiClient, SmtpProvider,
    TextProvider,
};
use crate::services::{ArtFinalizer, CardService, EmailDispatcher, MessageFinalizer};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cards: Arc<CardService>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(cards: Arc<CardService>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            cards,
            static_dir: static_dir.into(),
        }
    }

    /// Wire the card service from configuration.
    ///
    /// Each disabled collaborator is replaced by its mock so the service can
    /// run locally without credentials.
    pub fn from_settings(settings: &Settings) -> Self {
        let (text, images): (Arc<dyn TextProvider>, Arc<dyn ImageProvider>) =
            if settings.openai.enabled {
                match OpenAiClient::new(settings.openai.provider_config()) {
                    Ok(client) => {
                        tracing::info!("OpenAI provider initialized");
                        let client = Arc::new(client);
                        let text: Arc<dyn TextProvider> = client.clone();
                        let images: Arc<dyn ImageProvider> = client;
                        (text, images)
                    }
                    Err(e) => {
                        tracing::warn!("Failed to initialize OpenAI provider: {}. Using mock.", e);
                        mock_generators()
                    }
                }
            } else {
                tracing::info!("OpenAI provider disabled, using mock text and image providers");
                mock_generators()
            };

        let store: Arc<dyn ImageStore> = if settings.imagekit.enabled {
            match ImageKitStore::new(settings.imagekit.provider_config()) {
                Ok(store) => {
                    tracing::info!("ImageKit image store initialized");
                    Arc::new(store)
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize ImageKit store: {}. Using mock.", e);
                    Arc::new(MockImageStore::new(true))
                }
            }
        } else {
            tracing::info!("ImageKit disabled, using mock image store");
            Arc::new(MockImageStore::new(true))
        };

        let mailer: Arc<dyn EmailProvider> = if settings.smtp.enabled {
            match SmtpProvider::new(settings.smtp.provider_config()) {
                Ok(provider) => {
                    tracing::info!("SMTP email provider initialized");
                    Arc::new(provider)
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize SMTP provider: {}. Using mock.", e);
                    Arc::new(MockEmailProvider::new(true))
                }
            }
        } else {
            tracing::info!("SMTP provider disabled, using mock email provider");
            Arc::new(MockEmailProvider::new(true))
        };

        let cards = CardService::new(
            ArtFinalizer::new(
                text.clone(),
                images,
                settings.card.placeholder_image_url.clone(),
            ),
            MessageFinalizer::new(text.clone()),
            store,
            Arc::new(EmailDispatcher::new(text, mailer)),
        );

        Self::new(Arc::new(cards), settings.card.static_dir.clone())
    }
}

fn mock_generators() -> (Arc<dyn TextProvider>, Arc<dyn ImageProvider>) {
    (
        Arc::new(MockTextProvider::new(true)),
        Arc::new(MockImageProvider::new(true)),
    )
}
