//! Fake models for orchestrator tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::UploadedImage;
use super::model::{GeneratedImage, ImageModel, ModelError};

/// Replays a fixed list of outcomes, one per call.
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<GeneratedImage, ModelError>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    latency: Duration,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<GeneratedImage, ModelError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most calls that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _: &str, _: &UploadedImage) -> Result<GeneratedImage, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or(Err(ModelError::NoImage))
    }
}

/// Echoes each upload back as the generated image; uploads whose filename
/// starts with `bad` fail permanently.
#[derive(Default)]
pub struct EchoModel {
    calls: AtomicUsize,
}

impl EchoModel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(
        &self,
        _: &str,
        image: &UploadedImage,
    ) -> Result<GeneratedImage, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if image.filename.as_deref().is_some_and(|f| f.starts_with("bad")) {
            return Err(ModelError::Api {
                status: 400,
                body: "rejected".into(),
            });
        }
        Ok(GeneratedImage {
            data: BASE64.encode(&image.bytes),
            mime_type: Some(image.mime_type.clone()),
        })
    }
}
