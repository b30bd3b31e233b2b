//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use headshot_core::generation::GenerationError;
use headshot_core::headshots::PersistenceError;
use headshot_core::store::StoreError;
use headshot_core::styles::generic_fallback;
use thiserror::Error;
use tracing::error;

use crate::models::{ErrorResponse, GenerateErrorResponse};

/// Source tag on generate error bodies.
pub const ERROR_FALLBACK_SOURCE: &str = "error-fallback";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{message}")]
    Forbidden { code: &'static str, message: String },

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    LimitReached(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::LimitReached(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { code, .. } | AppError::Forbidden { code, .. } => code,
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::PayloadTooLarge(_) => "FILE_TOO_LARGE",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::LimitReached(_) => "LIMIT_REACHED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message; internal details are logged, not returned.
    pub fn message(&self) -> String {
        match self {
            AppError::Database(_) => "A database error occurred".into(),
            AppError::Internal(_) => "An unexpected error occurred".into(),
            other => other.to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Database(detail) | AppError::Internal(detail) => {
                error!(code = self.code(), detail = %detail, "request failed");
            }
            _ => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message: self.message(),
        });
        (self.status(), body).into_response()
    }
}

/// Error from the generate endpoint; renders with the generic fallback set so
/// clients always have images to show.
#[derive(Debug)]
pub struct GenerateFailure {
    pub error: AppError,
    /// Cookies to send with the error, e.g. a guest counter already charged.
    pub cookies: Option<CookieJar>,
}

impl GenerateFailure {
    pub fn with_cookies(mut self, jar: CookieJar) -> Self {
        self.cookies = Some(jar);
        self
    }
}

impl From<AppError> for GenerateFailure {
    fn from(error: AppError) -> Self {
        GenerateFailure {
            error,
            cookies: None,
        }
    }
}

impl From<GenerationError> for GenerateFailure {
    fn from(e: GenerationError) -> Self {
        AppError::from(e).into()
    }
}

impl IntoResponse for GenerateFailure {
    fn into_response(self) -> Response {
        let GenerateFailure { error, cookies } = self;
        error.log();
        let body = Json(GenerateErrorResponse {
            error: error.code().to_string(),
            message: error.message(),
            source: ERROR_FALLBACK_SOURCE.to_string(),
            images: generic_fallback(),
        });
        match cookies {
            Some(jar) => (error.status(), jar, body).into_response(),
            None => (error.status(), body).into_response(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<PersistenceError> for AppError {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::Unauthenticated => {
                AppError::Unauthorized("You must be logged in to manage headshots".into())
            }
            PersistenceError::MissingImageUrl => {
                AppError::bad_request("MISSING_IMAGE_URL", "Image URL is required")
            }
            PersistenceError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::NoImages => {
                AppError::bad_request("MISSING_FILES", "At least one image is required")
            }
            GenerationError::AllOversized { .. } => AppError::PayloadTooLarge(e.to_string()),
        }
    }
}
