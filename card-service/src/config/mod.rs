use crate::services::providers::email::SmtpConfig;
use crate::services::providers::imagekit::ImageKitConfig;
use crate::services::providers::openai::OpenAiConfig;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

pub const SERVICE_NAME: &str = "card-service";

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub imagekit: ImageKitSettings,
    pub smtp: SmtpSettings,
    #[serde(default)]
    pub card: CardSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Traces are only exported when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone)]
pub struct OpenAiSettings {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    pub api_key: Secret<String>,
    /// Key for image generation. Falls back to `api_key` when unset.
    #[serde(default)]
    pub image_api_key: Option<Secret<String>>,
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub enabled: bool,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_completion_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl OpenAiSettings {
    pub fn provider_config(&self) -> OpenAiConfig {
        let image_api_key = self
            .image_api_key
            .as_ref()
            .unwrap_or(&self.api_key)
            .expose_secret()
            .clone();

        OpenAiConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.expose_secret().clone(),
            image_api_key,
            completion_model: self.completion_model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct ImageKitSettings {
    #[serde(default = "default_imagekit_upload_url")]
    pub upload_url: String,
    pub private_key: Secret<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub enabled: bool,
}

fn default_imagekit_upload_url() -> String {
    "https://upload.imagekit.io/api/v1/files/upload".to_string()
}

impl ImageKitSettings {
    pub fn provider_config(&self) -> ImageKitConfig {
        ImageKitConfig {
            upload_url: self.upload_url.clone(),
            private_key: self.private_key.expose_secret().clone(),
            folder: self.folder.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub user: String,
    pub password: Secret<String>,
    #[serde(default = "default_from_email")]
    pub from_email: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_hello_name")]
    pub hello_name: String,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default)]
    pub enabled: bool,
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_email() -> String {
    "hello@alphajot.com".to_string()
}

fn default_from_name() -> String {
    "Alphajot".to_string()
}

fn default_hello_name() -> String {
    "alphajot.com".to_string()
}

impl SmtpSettings {
    pub fn provider_config(&self) -> SmtpConfig {
        SmtpConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.expose_secret().clone(),
            from_email: self.from_email.clone(),
            from_name: self.from_name.clone(),
            hello_name: self.hello_name.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
            enabled: self.enabled,
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct CardSettings {
    /// Shown when image generation fails.
    #[serde(default = "default_placeholder_image_url")]
    pub placeholder_image_url: String,
    /// Directory served for `/css`, `/js` and `/images`. Relative paths are
    /// resolved against the service root.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            placeholder_image_url: default_placeholder_image_url(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_placeholder_image_url() -> String {
    "https://alphajot.com/images/example.png".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

/// Load settings from `card-service/config` and the environment.
///
/// A relative `card.static_dir` is made absolute against the service root so
/// the binary serves assets from either working directory.
pub fn get_configuration() -> Result<Settings, AppError> {
    let service_root = service_core::config::service_root(SERVICE_NAME)?;
    let mut settings: Settings = service_core::config::load(&service_root)?;

    if settings.card.static_dir.is_relative() {
        settings.card.static_dir = service_root.join(&settings.card.static_dir);
    }

    Ok(settings)
}
