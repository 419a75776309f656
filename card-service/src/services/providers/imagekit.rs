//! ImageKit image store.
//!
//! Generated images are only hosted by the image provider for a short time,
//! so confirmed cards are copied into ImageKit. The upload API fetches the
//! source URL itself; we never download the image bytes.

use super::{ImageStore, ProviderError};
use async_trait::async_trait;
use reqwest::{multipart::Form, Client};
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// ImageKit store configuration.
#[derive(Debug, Clone)]
pub struct ImageKitConfig {
    pub upload_url: String,
    pub private_key: String,
    pub folder: Option<String>,
    pub timeout: Duration,
}

pub struct ImageKitStore {
    config: ImageKitConfig,
    client: Client,
}

impl ImageKitStore {
    pub fn new(config: ImageKitConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn upload_form(&self, source_url: &str, file_name: &str) -> Form {
        let form = Form::new()
            .text("file", source_url.to_string())
            .text("fileName", file_name.to_string());

        match &self.config.folder {
            Some(folder) => form.text("folder", folder.clone()),
            None => form,
        }
    }
}

#[async_trait]
impl ImageStore for ImageKitStore {
    async fn upload_from_url(
        &self,
        source_url: &str,
        file_name: &str,
    ) -> Result<String, ProviderError> {
        // Private key as the basic-auth user, empty password.
        let response = self
            .client
            .traced_post(&self.config.upload_url)
            .basic_auth(&self.config.private_key, Some(""))
            .multipart(self.upload_form(source_url, file_name))
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }
            return Err(ProviderError::ApiError(format!(
                "ImageKit upload error {}: {}",
                status, error_text
            )));
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse upload response: {}", e))
        })?;

        tracing::info!(
            file_id = uploaded.file_id.as_deref().unwrap_or("-"),
            file_name = %file_name,
            url = %uploaded.url,
            "Image uploaded to ImageKit"
        );

        Ok(uploaded.url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    url: String,
    file_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upload_response() {
        let uploaded: UploadResponse = serde_json::from_str(
            r#"{"fileId":"abc123","name":"f.png","url":"https://ik.imagekit.io/demo/f.png","size":42}"#,
        )
        .unwrap();
        assert_eq!(uploaded.url, "https://ik.imagekit.io/demo/f.png");
        assert_eq!(uploaded.file_id.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn unreachable_upload_endpoint_fails() {
        let store = ImageKitStore::new(ImageKitConfig {
            upload_url: "http://127.0.0.1:9/api/v1/files/upload".to_string(),
            private_key: "private_test".to_string(),
            folder: None,
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let result = store
            .upload_from_url("https://img.example/a.png", "a.png")
            .await;
        assert!(matches!(result, Err(ProviderError::NetworkError(_))));
    }
}
