//! HTTP client for the text and image generation endpoints.
//!
//! The text endpoint takes the full conversation (`{"contents": [...]}`)
//! and answers with candidates whose first content part carries the reply
//! text. The image endpoint takes `{"prompt", "model"}` and answers with
//! an image URL; the client downloads it and re-encodes the bytes to
//! base64 so the session can persist the image inline.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use nexa_core::error::{Error, Result};
use nexa_core::generate::{GeneratedImage, ReplyGenerator};
use nexa_core::models::Content;
use nexa_core::Config;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

#[derive(Debug, Serialize)]
struct GenerateTextRequest<'a> {
    contents: &'a [Content],
}

#[derive(Debug, Deserialize)]
struct GenerateTextResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Error shape the provider may attach to a response body.
#[derive(Debug, Deserialize)]
struct ProviderError {
    code: Option<i64>,
    message: Option<String>,
}

impl ProviderError {
    fn describe(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unknown provider error");
        match self.code {
            Some(code) => format!("{message} (code {code})"),
            None => message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateImageRequest<'a> {
    prompt: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateImageResponse {
    url: Option<String>,
    error: Option<ProviderError>,
}

/// Generation backend speaking to the configured HTTP endpoints.
pub struct HttpGenerator {
    client: reqwest::Client,
    text_endpoint: String,
    image_endpoint: String,
    image_model: String,
}

impl HttpGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            text_endpoint: config.text_endpoint.clone(),
            image_endpoint: config.image_endpoint.clone(),
            image_model: config.image_model.clone(),
        }
    }

    fn extract_reply(response: GenerateTextResponse) -> Result<String> {
        if let Some(error) = response.error {
            return Err(Error::Generate(error.describe()));
        }
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.first_text().map(str::to_string))
            .ok_or_else(|| Error::Generate("response carried no candidate text".to_string()))
    }

    fn extract_image_url(response: GenerateImageResponse) -> Result<String> {
        if let Some(error) = response.error {
            return Err(Error::Generate(error.describe()));
        }
        response
            .url
            .ok_or_else(|| Error::Generate("image response carried no url".to_string()))
    }

    /// Download the generated image and re-encode it for inline
    /// persistence. The MIME type comes from the response header,
    /// defaulting to JPEG.
    async fn fetch_image(&self, url: &str) -> Result<GeneratedImage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| Error::Generate(format!("image download failed: {err}")))?;

        if !response.status().is_success() {
            return Err(Error::Generate(format!(
                "image download failed with status {}",
                response.status()
            )));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map_or_else(|| DEFAULT_IMAGE_MIME.to_string(), |v| v.trim().to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|err| Error::Generate(format!("image download failed: {err}")))?;

        Ok(GeneratedImage {
            mime_type,
            data: BASE64.encode(&bytes),
        })
    }
}

#[async_trait]
impl ReplyGenerator for HttpGenerator {
    async fn generate_text(&self, contents: &[Content]) -> Result<String> {
        debug!(turns = contents.len(), "requesting text generation");
        let response = self
            .client
            .post(&self.text_endpoint)
            .json(&GenerateTextRequest { contents })
            .send()
            .await
            .map_err(|err| Error::Generate(format!("request failed: {err}")))?;

        let status = response.status();
        let body: GenerateTextResponse = response
            .json()
            .await
            .map_err(|err| Error::Generate(format!("malformed response: {err}")))?;

        // A provider error in the body is more specific than the status.
        if body.error.is_none() && !status.is_success() {
            return Err(Error::Generate(format!(
                "request failed with status {status}"
            )));
        }
        Self::extract_reply(body)
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        debug!(model = %self.image_model, "requesting image generation");
        let response = self
            .client
            .post(&self.image_endpoint)
            .json(&GenerateImageRequest {
                prompt,
                model: &self.image_model,
            })
            .send()
            .await
            .map_err(|err| Error::Generate(format!("request failed: {err}")))?;

        let status = response.status();
        let body: GenerateImageResponse = response
            .json()
            .await
            .map_err(|err| Error::Generate(format!("malformed response: {err}")))?;

        if body.error.is_none() && !status.is_success() {
            return Err(Error::Generate(format!(
                "request failed with status {status}"
            )));
        }
        let url = Self::extract_image_url(body)?;
        self.fetch_image(&url).await
    }
}
