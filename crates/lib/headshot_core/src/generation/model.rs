//! Image model seam.

use async_trait::async_trait;
use thiserror::Error;

use super::UploadedImage;

/// Raw payload returned by a model: base64 body or data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Image model is not configured")]
    NotConfigured,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response contained no image")]
    NoImage,

    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("Model call timed out")]
    Timeout,
}

impl ModelError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Transport(_)
            | ModelError::RateLimited(_)
            | ModelError::NoImage
            | ModelError::InvalidPayload(_) => true,
            ModelError::Api { status, .. } => *status >= 500,
            ModelError::NotConfigured | ModelError::Timeout => false,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ModelError::RateLimited(_))
    }
}

/// A generative model that turns one photo plus a prompt into one image.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Model identifier reported by the status endpoint.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        image: &UploadedImage,
    ) -> Result<GeneratedImage, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ModelError::Transport("reset".into()).is_transient());
        assert!(ModelError::RateLimited("quota".into()).is_transient());
        assert!(ModelError::NoImage.is_transient());
        assert!(
            ModelError::Api {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !ModelError::Api {
                status: 400,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!ModelError::Timeout.is_transient());
        assert!(!ModelError::NotConfigured.is_transient());
    }
}
