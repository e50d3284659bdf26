//! Outbound generation boundary.
//!
//! The session controller talks to the provider through this port, so
//! tests substitute a scripted generator and the HTTP client lives in a
//! separate crate.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Content, InlineData};

/// An image produced by the backend, already re-encoded to base64 for
/// inline persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

impl From<GeneratedImage> for InlineData {
    fn from(image: GeneratedImage) -> Self {
        InlineData::new(image.mime_type, image.data)
    }
}

/// Produces assistant replies for a session.
#[async_trait]
pub trait ReplyGenerator {
    /// Produce the next assistant reply given the full conversation so
    /// far, oldest-first.
    async fn generate_text(&self, contents: &[Content]) -> Result<String>;

    /// Produce an image for an `/imagine` prompt.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage>;
}
