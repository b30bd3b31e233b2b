//! Per-image retry wrapper around [`ImageModel::generate`].

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use super::UploadedImage;
use super::model::{ImageModel, ModelError};
use super::quota::normalize_image_payload;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts after the first.
    pub max_retries: u32,
    /// First backoff; doubles per attempt.
    pub base_delay: Duration,
    /// Multiplier on the base delay after a rate-limit or quota error.
    pub rate_limit_factor: u32,
    /// Bound on a single attempt. Expiry abandons the image.
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            rate_limit_factor: 5,
            call_timeout: Duration::from_secs(90),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32, error: &ModelError) -> Duration {
        let base = if error.is_rate_limited() {
            self.base_delay * self.rate_limit_factor
        } else {
            self.base_delay
        };
        base * 2u32.saturating_pow(attempt)
    }
}

/// Generate one image, retrying transient failures. Returns a data URI.
pub async fn generate_with_retry(
    model: &dyn ImageModel,
    prompt: &str,
    image: &UploadedImage,
    policy: &RetryPolicy,
) -> Result<String, ModelError> {
    let mut attempt = 0;
    loop {
        let outcome = match timeout(policy.call_timeout, model.generate(prompt, image)).await {
            Ok(result) => result.and_then(|generated| normalize_image_payload(&generated)),
            Err(_) => Err(ModelError::Timeout),
        };

        match outcome {
            Ok(uri) => {
                debug!(attempt, "image generated");
                return Ok(uri);
            }
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.backoff(attempt, &e);
                warn!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "retrying image generation");
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(attempt, error = %e, "image generation abandoned");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::model::GeneratedImage;
    use crate::generation::testing::ScriptedModel;

    fn upload() -> UploadedImage {
        UploadedImage {
            bytes: vec![1, 2, 3],
            mime_type: "image/jpeg".into(),
            filename: None,
        }
    }

    fn ok() -> Result<GeneratedImage, ModelError> {
        Ok(GeneratedImage {
            data: "aGVsbG8=".into(),
            mime_type: None,
        })
    }

    #[test]
    fn backoff_doubles_and_scales_for_rate_limits() {
        let policy = RetryPolicy::default();
        let transport = ModelError::Transport("reset".into());
        let limited = ModelError::RateLimited("quota".into());
        assert_eq!(policy.backoff(0, &transport), Duration::from_secs(1));
        assert_eq!(policy.backoff(1, &transport), Duration::from_secs(2));
        assert_eq!(policy.backoff(0, &limited), Duration::from_secs(5));
        assert_eq!(policy.backoff(1, &limited), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let model = ScriptedModel::new(vec![
            Err(ModelError::Transport("reset".into())),
            Err(ModelError::RateLimited("quota".into())),
            ok(),
        ]);
        let uri = generate_with_retry(&model, "p", &upload(), &RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(uri, "data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let model = ScriptedModel::new(vec![
            Err(ModelError::NoImage),
            Err(ModelError::NoImage),
            Err(ModelError::NoImage),
            ok(),
        ]);
        let err = generate_with_retry(&model, "p", &upload(), &RetryPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::NoImage));
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_payload_is_retried() {
        let model = ScriptedModel::new(vec![
            Ok(GeneratedImage {
                data: "%%%".into(),
                mime_type: None,
            }),
            ok(),
        ]);
        assert!(
            generate_with_retry(&model, "p", &upload(), &RetryPolicy::default())
                .await
                .is_ok()
        );
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let model = ScriptedModel::new(vec![Err(ModelError::Api {
            status: 400,
            body: "bad".into(),
        })]);
        assert!(
            generate_with_retry(&model, "p", &upload(), &RetryPolicy::default())
                .await
                .is_err()
        );
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_abandons_the_image() {
        let model = ScriptedModel::new(vec![ok(), ok()]).with_latency(Duration::from_secs(120));
        let err = generate_with_retry(&model, "p", &upload(), &RetryPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Timeout));
        assert_eq!(model.calls(), 1);
    }
}
