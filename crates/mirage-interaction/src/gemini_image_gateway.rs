//! GeminiImageGateway - Direct REST implementation of the generation gateway.
//!
//! Sends the captured photo plus the instruction to a Gemini image model and
//! returns the first inline image of the response. The API key is read from
//! the secret service on every call, so a credential reselection takes
//! effect on the next attempt.

use async_trait::async_trait;
use mirage_core::config::GenerationConfig;
use mirage_core::generation::{GenerationGateway, ProviderError};
use mirage_core::image::EncodedImage;
use mirage_core::secret::SecretService;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const MISSING_KEY_MESSAGE: &str = "API Key not found. Please connect your account.";

/// Generation gateway that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiImageGateway {
    client: Client,
    secrets: Arc<dyn SecretService>,
    endpoint: String,
    model: String,
}

impl GeminiImageGateway {
    pub fn new(
        secrets: Arc<dyn SecretService>,
        config: &GenerationConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            secrets,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn api_key(&self) -> Result<String, ProviderError> {
        let secrets = self.secrets.load_secrets().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to load generation credentials");
            ProviderError::new(MISSING_KEY_MESSAGE)
        })?;
        secrets
            .gemini_key()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::new(MISSING_KEY_MESSAGE))
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.endpoint,
            model = self.model
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            // The URL carries the key; keep it out of the message.
            .map_err(|err| {
                ProviderError::new(format!("Gemini API request failed: {}", err.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        response.json().await.map_err(|err| {
            ProviderError::new(format!(
                "Failed to parse Gemini response: {}",
                err.without_url()
            ))
        })
    }
}

#[async_trait]
impl GenerationGateway for GeminiImageGateway {
    async fn generate(
        &self,
        image: &EncodedImage,
        prompt: &str,
    ) -> Result<EncodedImage, ProviderError> {
        let api_key = self.api_key().await?;
        let request = GenerateContentRequest::new(image, prompt);

        tracing::info!(model = %self.model, input_bytes = image.len(), "Requesting portrait generation");
        let response = self.send_request(&api_key, &request).await?;

        let generated = extract_image(response)?;
        tracing::info!(
            mime_type = generated.mime_type(),
            output_bytes = generated.len(),
            "Portrait generated"
        );
        Ok(generated)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn new(image: &EncodedImage, prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineDataPayload {
                            mime_type: image.mime_type().to_string(),
                            data: image.to_base64(),
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartResponse {
    inline_data: Option<InlineDataPayload>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Picks the first inline image from the first candidate.
fn extract_image(response: GenerateContentResponse) -> Result<EncodedImage, ProviderError> {
    let candidate = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or_else(|| ProviderError::new("No candidates returned from the API."))?;

    let inline = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .find_map(|part| part.inline_data)
        .ok_or_else(|| {
            ProviderError::new(
                "No image data found in the response. The model may have returned text only.",
            )
        })?;

    EncodedImage::from_base64(inline.mime_type, &inline.data)
        .map_err(|e| ProviderError::new(format!("Gemini returned unreadable image data: {e}")))
}

/// Builds the failure message for a non-2xx response.
///
/// The numeric status always leads the message (e.g. `429 RESOURCE_EXHAUSTED:
/// ...`), which is what the credential-failure classifier keys on.
fn map_http_error(status: StatusCode, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                trimmed.to_string()
            }
        });

    ProviderError::new(format!("{} {detail}", status.as_u16()))
}
