use super::prompts::{self, ArtTheme};
use super::providers::{ImageParams, ImageProvider, TextProvider};
use metrics::counter;
use std::sync::Arc;

/// Turns an art theme into a generated image URL.
///
/// This pipeline never fails outward: a failed brief falls back to a canned
/// prompt and a failed image falls back to the placeholder image. Compare
/// [`super::message::MessageFinalizer`], which propagates its failure.
pub struct ArtFinalizer {
    text: Arc<dyn TextProvider>,
    images: Arc<dyn ImageProvider>,
    placeholder_url: String,
}

impl ArtFinalizer {
    pub fn new(
        text: Arc<dyn TextProvider>,
        images: Arc<dyn ImageProvider>,
        placeholder_url: impl Into<String>,
    ) -> Self {
        Self {
            text,
            images,
            placeholder_url: placeholder_url.into(),
        }
    }

    pub async fn finalize(&self, theme_key: &str) -> String {
        let theme = ArtTheme::from_key(theme_key);

        let brief = match self
            .text
            .complete(&theme.meta_prompt(), &prompts::creative_params())
            .await
        {
            Ok(brief) => brief,
            Err(e) => {
                tracing::warn!(theme = %theme_key, error = %e, "Art brief generation failed, using fallback brief");
                counter!("card_fallbacks_total", "stage" => "art_brief").increment(1);
                prompts::fallback_brief(theme_key)
            }
        };

        let prompt = prompts::image_prompt(&brief, &theme);
        tracing::info!(image_prompt = %prompt, "Image prompt finalized");

        match self.images.generate(&prompt, &ImageParams::default()).await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, "AI image generation failed, using placeholder image");
                counter!("card_fallbacks_total", "stage" => "image").increment(1);
                self.placeholder_url.clone()
            }
        }
    }
}
