//! Prompt construction for the completion service.
//!
//! All natural-language instructions and the literal fallbacks live here so
//! the finalizers only deal with control flow.

use super::providers::GenerationParams;

/// Art theme used when the form names neither a free-text prompt nor a preset.
pub const DEFAULT_ART_PROMPT: &str = "traditional christmas scene";

/// Recipient used when the form leaves the recipient blank.
pub const DEFAULT_RECIPIENT: &str = "all the sender's friends";

/// Subject used when subject generation fails or comes back empty.
pub const FALLBACK_SUBJECT: &str = "Merry Christmas!";

/// Sampling for the art brief and the card message.
pub fn creative_params() -> GenerationParams {
    GenerationParams::new(0.7, 100)
}

/// Sampling for the email subject line.
pub fn subject_params() -> GenerationParams {
    GenerationParams::new(0.5, 20)
}

/// Art theme selected by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtTheme<'a> {
    Christmas,
    WinterLandscape,
    FineArt,
    Nativity,
    /// Anything outside the preset keys, treated as a free-text description.
    Described(&'a str),
}

impl<'a> ArtTheme<'a> {
    pub fn from_key(key: &'a str) -> Self {
        match key {
            "christmas" => Self::Christmas,
            "winterlandscape" => Self::WinterLandscape,
            "fineart" => Self::FineArt,
            "nativity" => Self::Nativity,
            other => Self::Described(other),
        }
    }

    /// Instruction asking the completion service for a short art brief.
    pub fn meta_prompt(&self) -> String {
        match self {
            Self::Christmas => "Write a brief idea for some Christmas card art, possibly including Santa Claus, Christmas trees, or reindeer:".to_string(),
            Self::WinterLandscape => {
                "Write a brief idea for a beautiful winter landscape painting:".to_string()
            }
            Self::FineArt => {
                "Write a brief idea for a beautiful example of fine art painting:".to_string()
            }
            Self::Nativity => {
                "Write a brief idea for an image depiction of the nativity scene and its medium:"
                    .to_string()
            }
            Self::Described(description) => format!(
                "Write an brief idea for an image, described as: {}",
                description
            ),
        }
    }

    /// Style hint appended to the brief before image generation.
    ///
    /// The "fine art painting" hint is keyed on the free-text description
    /// `fine art`, not on the `fineart` preset, so the preset falls through to
    /// the generic `, fineart` hint. See DESIGN.md before changing this.
    pub fn style_suffix(&self) -> Option<String> {
        match self {
            Self::Christmas => Some(", christmas card art".to_string()),
            Self::WinterLandscape => Some(", detailed painting".to_string()),
            Self::Described("fine art") => Some(", fine art painting".to_string()),
            Self::Nativity => None,
            Self::FineArt => Some(", fineart".to_string()),
            Self::Described(description) => Some(format!(", {}", description)),
        }
    }
}

/// Brief used when the completion service cannot produce one.
pub fn fallback_brief(theme_key: &str) -> String {
    format!("{}, a detailed painting", theme_key)
}

/// Final image-generation prompt: brief plus the theme's style hint.
pub fn image_prompt(brief: &str, theme: &ArtTheme<'_>) -> String {
    match theme.style_suffix() {
        Some(suffix) => format!("{}{}", brief, suffix),
        None => brief.to_string(),
    }
}

/// Instruction for the greeting message itself. An empty sender means the
/// card is anonymous.
pub fn message_prompt(theme: &str, recipient: &str, sender: &str) -> String {
    let mut prompt = format!(
        "Write brief, unique text for a Christmas greeting card to {}. Details: should be \"{}\". ",
        recipient, theme
    );

    if sender.is_empty() {
        prompt.push_str("From an anonymous sender.");
    } else {
        prompt.push_str(&format!("Name of sender: {}.", sender));
    }

    prompt
}

/// Instruction for the email subject, seeded with the card text. Paragraph
/// tags are turned back into newlines.
pub fn subject_prompt(message_html: &str) -> String {
    let text = message_html.replace("<p>", "\n").replace("</p>", "\n");
    format!(
        "Write a short subject line for an email with the following text: {}. Subject: ",
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_keys_select_their_meta_prompt() {
        assert!(ArtTheme::from_key("christmas")
            .meta_prompt()
            .contains("Christmas card art"));
        assert!(ArtTheme::from_key("winterlandscape")
            .meta_prompt()
            .contains("winter landscape"));
        assert!(ArtTheme::from_key("fineart")
            .meta_prompt()
            .contains("fine art painting"));
        assert!(ArtTheme::from_key("nativity")
            .meta_prompt()
            .contains("nativity scene"));
    }

    #[test]
    fn unknown_key_is_wrapped_as_description() {
        let theme = ArtTheme::from_key("a cat in a scarf");
        assert_eq!(theme, ArtTheme::Described("a cat in a scarf"));
        assert_eq!(
            theme.meta_prompt(),
            "Write an brief idea for an image, described as: a cat in a scarf"
        );
    }

    #[test]
    fn style_suffixes() {
        assert_eq!(
            image_prompt("snowy village", &ArtTheme::Christmas),
            "snowy village, christmas card art"
        );
        assert_eq!(
            image_prompt("frozen lake", &ArtTheme::WinterLandscape),
            "frozen lake, detailed painting"
        );
        assert_eq!(
            image_prompt("manger at night", &ArtTheme::Nativity),
            "manger at night"
        );
        assert_eq!(
            image_prompt("a fox", &ArtTheme::from_key("red fox")),
            "a fox, red fox"
        );
    }

    #[test]
    fn fine_art_hint_only_matches_free_text() {
        assert_eq!(
            image_prompt("still life", &ArtTheme::from_key("fine art")),
            "still life, fine art painting"
        );
        assert_eq!(
            image_prompt("still life", &ArtTheme::from_key("fineart")),
            "still life, fineart"
        );
    }

    #[test]
    fn message_prompt_names_sender() {
        let prompt = message_prompt("funny", "Grandma", "Sam");
        assert_eq!(
            prompt,
            "Write brief, unique text for a Christmas greeting card to Grandma. Details: should be \"funny\". Name of sender: Sam."
        );
    }

    #[test]
    fn message_prompt_marks_anonymous_sender() {
        let prompt = message_prompt("warm", DEFAULT_RECIPIENT, "");
        assert!(prompt.contains("to all the sender's friends."));
        assert!(prompt.ends_with("From an anonymous sender."));
    }

    #[test]
    fn subject_prompt_strips_paragraph_tags() {
        let prompt = subject_prompt("<p>Dear Sam,</p><p>Happy holidays!</p>");
        assert!(!prompt.contains("<p>"));
        assert!(prompt.contains("\nDear Sam,\n"));
        assert!(prompt.ends_with(". Subject: "));
    }
}
