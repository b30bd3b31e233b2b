//! API server configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use headshot_core::auth::jwt::resolve_jwt_secret;
use headshot_core::generation::DEFAULT_MAX_IMAGE_BYTES;
use headshot_core::generation::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};
use headshot_core::storage::LocalObjectStore;
use headshot_core::tier::price_map::{PriceMapError, PriceTierMap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PRICE_TIER_MAP: {0}")]
    PriceMap(#[from] PriceMapError),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Shared HS256 secret of the auth provider.
    pub jwt_secret: String,
    /// Image model settings; `None` disables generation.
    pub gemini: Option<GeminiConfig>,
    /// Bound on one model call.
    pub call_timeout: Duration,
    /// Bound on a whole generate request; exceeding it returns 408.
    pub request_timeout: Duration,
    /// Root directory for generated image objects.
    pub storage_dir: PathBuf,
    pub price_tiers: PriceTierMap,
    /// Per-file upload ceiling.
    pub max_upload_bytes: usize,
    /// Whole-request body ceiling.
    pub max_request_bytes: usize,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &"[redacted]")
            .field("jwt_secret", &"[redacted]")
            .field("gemini", &self.gemini)
            .field("call_timeout", &self.call_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("storage_dir", &self.storage_dir)
            .field("price_tiers", &self.price_tiers.len())
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("max_request_bytes", &self.max_request_bytes)
            .finish()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default                                |
    /// |------------------------|----------------------------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:3100`                       |
    /// | `DATABASE_URL`         | `postgres://localhost:5432/headshot`   |
    /// | `JWT_SECRET` / `AUTH_SECRET` | generated & persisted to file    |
    /// | `GEMINI_API_KEY`       | unset (sample images only)             |
    /// | `GEMINI_MODEL`         | `gemini-2.5-flash-image-preview`       |
    /// | `GEMINI_BASE_URL`      | Google Generative Language endpoint    |
    /// | `GEMINI_TIMEOUT_SECS`  | `90`                                   |
    /// | `GENERATE_TIMEOUT_SECS`| `300`                                  |
    /// | `STORAGE_DIR`          | `<data dir>/headshot/objects`          |
    /// | `PRICE_TIER_MAP`       | empty (legacy markers only)            |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                             |
    /// | `MAX_REQUEST_BYTES`    | `67108864`                             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let call_timeout = Duration::from_secs(parse_number(&var, "GEMINI_TIMEOUT_SECS", 90)?);
        let gemini = var("GEMINI_API_KEY").map(|api_key| GeminiConfig {
            api_key,
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            base_url: var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            timeout: call_timeout,
        });

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3100".into()),
            database_url: var("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost:5432/headshot".into()),
            jwt_secret: var("JWT_SECRET")
                .or_else(|| var("AUTH_SECRET"))
                .unwrap_or_else(resolve_jwt_secret),
            gemini,
            call_timeout,
            request_timeout: Duration::from_secs(parse_number(&var, "GENERATE_TIMEOUT_SECS", 300)?),
            storage_dir: var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(LocalObjectStore::default_root),
            price_tiers: PriceTierMap::parse(&var("PRICE_TIER_MAP").unwrap_or_default())?,
            max_upload_bytes: parse_number(&var, "MAX_UPLOAD_BYTES", DEFAULT_MAX_IMAGE_BYTES as u64)?
                as usize,
            max_request_bytes: parse_number(&var, "MAX_REQUEST_BYTES", 64 * 1024 * 1024)? as usize,
        })
    }
}

fn parse_number(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidNumber { var: key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use headshot_core::tier::Tier;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let mut map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        map.entry("JWT_SECRET".into()).or_insert_with(|| "test-secret".into());
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_model_key() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:3100");
        assert!(cfg.gemini.is_none());
        assert_eq!(cfg.call_timeout, Duration::from_secs(90));
        assert_eq!(cfg.max_upload_bytes, 10 * 1024 * 1024);
        assert!(cfg.price_tiers.is_empty());
    }

    #[test]
    fn model_settings_are_read() {
        let cfg = config(&[
            ("GEMINI_API_KEY", "AIzaKey"),
            ("GEMINI_MODEL", "gemini-x"),
            ("GEMINI_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        let gemini = cfg.gemini.unwrap();
        assert_eq!(gemini.model, "gemini-x");
        assert_eq!(gemini.base_url, DEFAULT_BASE_URL);
        assert_eq!(gemini.timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_key_disables_model() {
        let cfg = config(&[("GEMINI_API_KEY", "   ")]).unwrap();
        assert!(cfg.gemini.is_none());
    }

    #[test]
    fn auth_secret_is_a_fallback() {
        let cfg = ApiConfig::from_lookup(|key| (key == "AUTH_SECRET").then(|| "shared".to_string()))
            .unwrap();
        assert_eq!(cfg.jwt_secret, "shared");
    }

    #[test]
    fn price_map_is_validated() {
        let cfg = config(&[("PRICE_TIER_MAP", "price_a=pro,price_b=premium")]).unwrap();
        assert_eq!(cfg.price_tiers.classify(Some("price_a")), Tier::Pro);
        assert!(matches!(
            config(&[("PRICE_TIER_MAP", "price_a=gold")]),
            Err(ConfigError::PriceMap(_))
        ));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            config(&[("MAX_UPLOAD_BYTES", "lots")]),
            Err(ConfigError::InvalidNumber { var: "MAX_UPLOAD_BYTES", .. })
        ));
        assert!(config(&[("GEMINI_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn debug_hides_secrets() {
        let cfg = config(&[("GEMINI_API_KEY", "AIzaSuperSecret")]).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("test-secret"));
        assert!(!rendered.contains("SuperSecret"));
    }
}
