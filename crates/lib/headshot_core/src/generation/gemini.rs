//! Google Generative Language `generateContent` client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::UploadedImage;
use super::model::{GeneratedImage, ImageModel, ModelError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Transport-level ceiling; the orchestrator applies its own per-call
    /// timeout on top.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// First four characters of the key, for logs.
    pub fn key_hint(&self) -> String {
        let head: String = self.api_key.chars().take(4).collect();
        format!("{head}…")
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.key_hint())
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ModelError> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;
        debug!(model = %config.model, key = %config.key_hint(), "gemini client ready");
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(prompt: &str, image: &UploadedImage) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    {
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": BASE64.encode(&image.bytes),
                        }
                    }
                ]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"]
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

fn first_image(response: GenerateResponse) -> Option<GeneratedImage> {
    response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.inline_data)
        .find(|d| !d.data.is_empty())
        .map(|d| GeneratedImage {
            data: d.data,
            mime_type: d.mime_type,
        })
}

fn classify_failure(status: StatusCode, body: String) -> ModelError {
    let quota = body.contains("RESOURCE_EXHAUSTED") || body.to_ascii_lowercase().contains("quota");
    if status == StatusCode::TOO_MANY_REQUESTS || quota {
        ModelError::RateLimited(body)
    } else {
        ModelError::Api {
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        prompt: &str,
        image: &UploadedImage,
    ) -> Result<GeneratedImage, ModelError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&Self::request_body(prompt, image))
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "gemini request failed");
            return Err(classify_failure(status, body));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidPayload(e.to_string()))?;
        first_image(parsed).ok_or(ModelError::NoImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upload() -> UploadedImage {
        UploadedImage {
            bytes: vec![0xff, 0xd8, 0xff],
            mime_type: "image/jpeg".into(),
            filename: Some("me.jpg".into()),
        }
    }

    fn client(server: &MockServer) -> GeminiClient {
        let mut config = GeminiConfig::new("test-key-123");
        config.model = "gemini-test".into();
        config.base_url = server.uri();
        GeminiClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn returns_inline_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "parts": [
                            { "text": "here you go" },
                            { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } }
                        ]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let image = client(&server).generate("prompt", &upload()).await.unwrap();
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn accepts_snake_case_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "inline_data": { "mime_type": "image/jpeg", "data": "aGk=" } }] }
                }]
            })))
            .mount(&server)
            .await;

        let image = client(&server).generate("prompt", &upload()).await.unwrap();
        assert_eq!(image.data, "aGk=");
    }

    #[tokio::test]
    async fn text_only_response_is_no_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "sorry" }] } }]
            })))
            .mount(&server)
            .await;

        let err = client(&server).generate("prompt", &upload()).await.unwrap_err();
        assert!(matches!(err, ModelError::NoImage));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client(&server).generate("prompt", &upload()).await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn server_error_is_transient_client_error_is_not() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-goog-api-key", "test-key-123"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;
        let err = client(&server).generate("prompt", &upload()).await.unwrap_err();
        assert!(err.is_transient());

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&server)
            .await;
        let err = client(&server).generate("prompt", &upload()).await.unwrap_err();
        assert!(matches!(err, ModelError::Api { status: 400, .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn blank_key_is_not_configured() {
        assert!(matches!(
            GeminiClient::new(GeminiConfig::new("  ")),
            Err(ModelError::NotConfigured)
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = GeminiConfig::new("AIzaSecretValue");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("AIza…"));
        assert!(!rendered.contains("SecretValue"));
    }
}
