//! `POST /api/generate`: gate, generate, persist, respond.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Extension, Multipart, State};
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use headshot_core::generation::{ImageSource, UploadedImage};
use headshot_core::styles::StyleId;
use tracing::{debug, info, warn};

use crate::AppState;
use crate::error::{AppError, GenerateFailure};
use crate::middleware::auth::Caller;
use crate::models::GenerateResponse;
use crate::services::context::RequestContext;
use crate::services::cookies::{guest_credits, guest_credits_cookie};

/// Parsed multipart form.
#[derive(Debug, Default)]
struct GenerateForm {
    files: Vec<UploadedImage>,
    style: Option<String>,
    prompt: Option<String>,
}

fn form_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::bad_request("INVALID_REQUEST", e.body_text())
    }
}

async fn read_form(mut multipart: Multipart, max_file_bytes: usize) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(form_error)?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let filename = field.file_name().map(String::from);
                let mime_type = field.content_type().unwrap_or("image/jpeg").to_string();
                if !mime_type.starts_with("image/") {
                    return Err(AppError::bad_request(
                        "INVALID_FILE_TYPE",
                        format!("Unsupported file type: {mime_type}"),
                    ));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(form_error)?;
                if bytes.len() > max_file_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Each image must be at most {max_file_bytes} bytes"
                    )));
                }
                form.files.push(UploadedImage {
                    bytes: bytes.to_vec(),
                    mime_type,
                    filename,
                });
            }
            "style" | "prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(form_error)?;
                if name == "style" {
                    form.style = Some(text);
                } else {
                    form.prompt = Some(text);
                }
            }
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }
    Ok(form)
}

pub async fn generate_handler(
    State(state): State<AppState>,
    Extension(Caller(identity)): Extension<Caller>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<(CookieJar, Json<GenerateResponse>), GenerateFailure> {
    let form = read_form(multipart, state.config.max_upload_bytes).await?;
    if form.files.is_empty() {
        return Err(AppError::bad_request("MISSING_FILES", "At least one image is required").into());
    }
    let style = match form.style.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => StyleId::Professional,
        Some(raw) => raw
            .parse::<StyleId>()
            .map_err(|e| AppError::bad_request("INVALID_STYLE", e.to_string()))?,
    };

    let ctx = RequestContext::resolve(&state, identity).await;
    if !ctx.tier.allows_style(style) {
        return Err(AppError::Forbidden {
            code: "STYLE_NOT_ALLOWED",
            message: format!("The {style} style is not available on the {} plan", ctx.tier.tier),
        }
        .into());
    }

    let features = ctx.tier.features();
    let prompt = form.prompt.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let prompt = match prompt {
        Some(_) if !features.custom_prompting => {
            debug!(tier = %ctx.tier.tier, "custom prompt ignored for tier");
            None
        }
        other => other,
    };

    let mut guest = guest_credits(&jar);
    if !state
        .ledger
        .check_and_consume(ctx.identity.as_ref(), &ctx.tier, &mut guest)
        .await
    {
        return Err(AppError::LimitReached(
            "Monthly generation limit reached. Upgrade your plan for more credits.".into(),
        )
        .into());
    }

    // Charged: later error responses carry the updated guest counter too.
    let jar = if ctx.identity.is_none() {
        jar.add(guest_credits_cookie(&guest))
    } else {
        jar
    };

    let quota = ctx.tier.quota;
    let generation = state.orchestrator.generate(&form.files, prompt, style, quota);
    let result = match tokio::time::timeout(state.config.request_timeout, generation).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return Err(GenerateFailure::from(e).with_cookies(jar)),
        Err(_) => {
            let err = AppError::Timeout("Generation took too long, please try again".into());
            return Err(GenerateFailure::from(err).with_cookies(jar));
        }
    };

    info!(
        user_id = ctx.user_id().unwrap_or("guest"),
        style = %style,
        quota,
        source = ?result.source,
        "generation served"
    );

    if let (Some(user_id), ImageSource::ModelApi) = (ctx.user_id(), result.source) {
        let objects = state.objects.clone();
        let owner = user_id.to_string();
        let images = result.images.clone();
        tokio::spawn(async move {
            let written = headshot_core::storage::persist_generated(objects.as_ref(), &owner, &images).await;
            debug!(owner, written = written.len(), "generated images stored");
        });
    }

    let credits_remaining = match state
        .ledger
        .credit_status(ctx.identity.as_ref(), &ctx.tier, &guest)
        .await
    {
        Ok(status) => Some(status.remaining),
        Err(e) => {
            warn!(error = %e, "could not read remaining credits");
            None
        }
    };

    Ok((
        jar,
        Json(GenerateResponse {
            images: result.images,
            source: result.source,
            message: result.message,
            tier: ctx.tier.tier,
            is_guest: ctx.tier.is_guest,
            quota,
            credits_remaining,
        }),
    ))
}
