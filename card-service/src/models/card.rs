use crate::services::prompts::{DEFAULT_ART_PROMPT, DEFAULT_RECIPIENT};
use serde::Deserialize;

/// Fields posted by the landing page form to `/CreateCard`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCardForm {
    /// Free-text art description.
    pub artprompt: Option<String>,
    /// Preset art theme from the radio group.
    pub description: Option<String>,
    /// Free-text message details.
    pub msgprompt: Option<String>,
    /// Message theme.
    pub theme: Option<String>,
    pub recipient: Option<String>,
    pub sender: Option<String>,
    /// `on` when the sender asked to stay anonymous.
    pub anoncheck: Option<String>,
}

/// Fields posted back by the result page to `/ConfirmCard`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmCardForm {
    pub email: String,
    pub img: String,
    pub msg: String,
}

/// What a card should look like, derived once from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRequest {
    pub art_theme: String,
    pub message_theme: String,
    pub recipient_name: String,
    /// Empty when the card is anonymous.
    pub sender_name: String,
}

impl CardRequest {
    pub fn is_anonymous(&self) -> bool {
        self.sender_name.is_empty()
    }
}

/// A finished card: image URL and paragraph-formatted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardResult {
    pub image_url: String,
    pub message_html: String,
}

/// A request to email a card that was already shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub email: String,
    pub image_url: String,
    pub message_html: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<CreateCardForm> for CardRequest {
    fn from(form: CreateCardForm) -> Self {
        let art_theme = non_empty(form.artprompt)
            .or_else(|| non_empty(form.description))
            .unwrap_or_else(|| DEFAULT_ART_PROMPT.to_string());

        let theme = form.theme.unwrap_or_default();
        let message_theme = match non_empty(form.msgprompt) {
            Some(details) => format!("{}, {}", theme, details),
            None => theme,
        };

        let recipient_name =
            non_empty(form.recipient).unwrap_or_else(|| DEFAULT_RECIPIENT.to_string());

        let sender_name = if form.anoncheck.as_deref() == Some("on") {
            String::new()
        } else {
            form.sender.unwrap_or_default()
        };

        Self {
            art_theme,
            message_theme,
            recipient_name,
            sender_name,
        }
    }
}

impl From<ConfirmCardForm> for ConfirmRequest {
    fn from(form: ConfirmCardForm) -> Self {
        Self {
            email: form.email,
            image_url: form.img,
            message_html: form.msg,
        }
    }
}
