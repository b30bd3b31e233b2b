//! Generation orchestrator.
//!
//! Dispatches one model call per uploaded photo in bounded-parallel batches,
//! retries transient failures per image, and falls back to the style's
//! placeholder set when nothing could be generated. The final result always
//! holds exactly `quota` images.

pub mod gemini;
pub mod model;
pub mod quota;
pub mod retry;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use self::model::ImageModel;
use self::quota::fit_to_quota;
use self::retry::{RetryPolicy, generate_with_retry};
use crate::styles::{StyleId, fallback_for};

/// Default upload ceiling per image: 10 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// One uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: Option<String>,
}

/// Where a result's images came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageSource {
    ModelApi,
    MockData,
    FallbackData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub images: Vec<String>,
    pub source: ImageSource,
    pub message: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("No images were provided")]
    NoImages,

    #[error("Every image exceeds the {limit} byte limit")]
    AllOversized { limit: usize },
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Concurrent model calls per batch.
    pub batch_size: usize,
    /// Pause between batches.
    pub batch_pause: Duration,
    pub retry: RetryPolicy,
    pub max_image_bytes: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            batch_size: 2,
            batch_pause: Duration::from_secs(3),
            retry: RetryPolicy::default(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    model: Option<Arc<dyn ImageModel>>,
    settings: GenerationSettings,
}

impl Orchestrator {
    pub fn new(model: Option<Arc<dyn ImageModel>>, settings: GenerationSettings) -> Self {
        Self { model, settings }
    }

    /// Orchestrator with no model: always serves placeholder images.
    pub fn disabled() -> Self {
        Self::new(None, GenerationSettings::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub async fn generate(
        &self,
        images: &[UploadedImage],
        prompt: Option<&str>,
        style: StyleId,
        quota: usize,
    ) -> Result<GenerationResult, GenerationError> {
        if images.is_empty() {
            return Err(GenerationError::NoImages);
        }
        let limit = self.settings.max_image_bytes;
        let usable: Vec<&UploadedImage> = images.iter().filter(|i| i.bytes.len() <= limit).collect();
        if usable.is_empty() {
            return Err(GenerationError::AllOversized { limit });
        }
        if usable.len() < images.len() {
            warn!(skipped = images.len() - usable.len(), limit, "skipping oversized images");
        }

        let Some(model) = self.model.as_deref() else {
            info!(style = %style, quota, "image model disabled, serving sample images");
            return Ok(self.fallback(
                style,
                quota,
                "Image model is not configured; showing sample headshots",
            ));
        };

        let full_prompt = style.build_prompt(prompt);
        let generated = self.run_batches(model, &full_prompt, &usable).await;
        let produced = generated.len();
        info!(style = %style, produced, attempted = usable.len(), quota, "generation finished");

        if generated.is_empty() {
            return Ok(self.fallback(
                style,
                quota,
                "Image generation failed; showing sample headshots",
            ));
        }

        let message = (produced < quota)
            .then(|| format!("Generated {produced} of {quota} images; repeated to fill the set"));
        Ok(GenerationResult {
            images: fit_to_quota(generated, quota),
            source: ImageSource::ModelApi,
            message,
        })
    }

    async fn run_batches(
        &self,
        model: &dyn ImageModel,
        prompt: &str,
        images: &[&UploadedImage],
    ) -> Vec<String> {
        let batch_size = self.settings.batch_size.max(1);
        let batch_count = images.len().div_ceil(batch_size);
        let mut generated = Vec::with_capacity(images.len());

        for (index, batch) in images.chunks(batch_size).enumerate() {
            let calls = batch
                .iter()
                .map(|image| generate_with_retry(model, prompt, image, &self.settings.retry));
            for outcome in join_all(calls).await {
                // Failures were logged by the retry wrapper.
                if let Ok(uri) = outcome {
                    generated.push(uri);
                }
            }
            if index + 1 < batch_count && !self.settings.batch_pause.is_zero() {
                tokio::time::sleep(self.settings.batch_pause).await;
            }
        }
        generated
    }

    fn fallback(&self, style: StyleId, quota: usize, message: &str) -> GenerationResult {
        GenerationResult {
            images: fit_to_quota(fallback_for(style.as_str()), quota),
            source: ImageSource::MockData,
            message: Some(message.to_string()),
        }
    }
}
