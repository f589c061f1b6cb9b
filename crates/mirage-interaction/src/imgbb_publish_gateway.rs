//! ImgBB upload gateway: turns a generated portrait into a shareable URL.

use async_trait::async_trait;
use mirage_core::config::PublishConfig;
use mirage_core::image::EncodedImage;
use mirage_core::publish::{PublishError, PublishGateway};
use mirage_core::secret::SecretService;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Keys shorter than this are treated as not configured.
const MIN_KEY_LEN: usize = 10;

#[derive(Clone)]
pub struct ImgbbPublishGateway {
    client: Client,
    secrets: Arc<dyn SecretService>,
    endpoint: String,
}

impl ImgbbPublishGateway {
    pub fn new(
        secrets: Arc<dyn SecretService>,
        config: &PublishConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            secrets,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn api_key(&self) -> Result<String, PublishError> {
        let secrets = self.secrets.load_secrets().await.map_err(|e| {
            PublishError::configuration(format!("Could not read upload credentials: {e}"))
        })?;
        secrets
            .imgbb_key()
            .filter(|key| key.len() >= MIN_KEY_LEN)
            .map(str::to_string)
            .ok_or_else(|| PublishError::configuration("ImgBB API key is missing or invalid."))
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: Option<String>,
}

/// Decides whether a rejected upload is a configuration problem.
///
/// Only an authorization-style status whose message mentions the key counts;
/// everything else may succeed on a later attempt.
fn classify_rejection(status: u16, message: &str) -> PublishError {
    let mentions_key = message.to_ascii_lowercase().contains("key");
    if matches!(status, 400 | 401 | 403) && mentions_key {
        PublishError::configuration(message)
    } else {
        PublishError::transient(message)
    }
}

fn interpret_response(status: u16, body: &str) -> Result<String, PublishError> {
    let parsed: UploadResponse = serde_json::from_str(body).map_err(|_| {
        PublishError::transient(format!("Unexpected response from image host (HTTP {status})"))
    })?;

    if parsed.success {
        if let Some(data) = parsed.data {
            return Ok(data.url);
        }
    }

    let message = parsed
        .error
        .and_then(|error| error.message)
        .unwrap_or_else(|| "Failed to upload image. Please try again.".to_string());
    Err(classify_rejection(status, &message))
}

#[async_trait]
impl PublishGateway for ImgbbPublishGateway {
    async fn publish(&self, image: &EncodedImage) -> Result<String, PublishError> {
        let key = self.api_key().await?;

        let file = Part::bytes(image.bytes().to_vec())
            .file_name(format!("photo.{}", image.file_extension()))
            .mime_str(image.mime_type())
            .map_err(|e| PublishError::transient(format!("Invalid image type: {e}")))?;
        let form = Form::new().text("key", key).part("image", file);

        tracing::info!(bytes = image.len(), "Uploading portrait for sharing");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublishError::transient(format!("Upload failed: {}", e.without_url())))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PublishError::transient(format!("Upload failed: {}", e.without_url())))?;

        let result = interpret_response(status, &body);
        match &result {
            Ok(url) => tracing::info!(%url, "Portrait published"),
            Err(e) => tracing::warn!(kind = ?e.kind, error = %e, "Publish failed"),
        }
        result
    }
}
