//! Saved headshot endpoints.

use axum::Json;
use axum::extract::{Extension, State};
use chrono::Utc;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    DeleteHeadshotRequest, DeleteHeadshotResponse, HeadshotListResponse, SaveHeadshotRequest,
    SaveHeadshotResponse,
};

/// `POST /api/headshots/save`
pub async fn save_headshot_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    Json(body): Json<SaveHeadshotRequest>,
) -> AppResult<Json<SaveHeadshotResponse>> {
    let saved = state
        .headshots
        .save(
            Some(&identity),
            body.image_url.as_deref().unwrap_or_default(),
            body.style.as_deref(),
            body.description.as_deref(),
        )
        .await?;
    Ok(Json(SaveHeadshotResponse {
        success: true,
        message: "Headshot saved successfully".into(),
        data: saved.into(),
    }))
}

/// `GET /api/headshots/list`
pub async fn list_headshots_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
) -> AppResult<Json<HeadshotListResponse>> {
    let headshots = state.headshots.list(&identity).await?;
    Ok(Json(HeadshotListResponse {
        success: true,
        headshots: headshots.into_iter().map(Into::into).collect(),
        timestamp: Utc::now().timestamp_millis(),
    }))
}

/// `DELETE /api/headshots/delete` with body `{"id": "..."}`.
pub async fn delete_headshot_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    Json(body): Json<DeleteHeadshotRequest>,
) -> AppResult<Json<DeleteHeadshotResponse>> {
    let raw = body
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::bad_request("MISSING_ID", "Headshot ID is required"))?;
    let id = Uuid::parse_str(raw)
        .map_err(|_| AppError::bad_request("INVALID_ID", "Headshot ID is not a valid UUID"))?;

    let deleted = state.headshots.delete(&identity, id).await?;
    let message = if deleted {
        "Headshot deleted successfully"
    } else {
        "No matching headshot found"
    };
    Ok(Json(DeleteHeadshotResponse {
        success: true,
        deleted,
        message: message.into(),
    }))
}
