//! `GET /api/credits`

use axum::Json;
use axum::extract::{Extension, State};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::models::CreditsResponse;
use crate::services::context::RequestContext;
use crate::services::cookies::guest_credits;

pub async fn credits_handler(
    State(state): State<AppState>,
    Extension(Caller(identity)): Extension<Caller>,
    jar: CookieJar,
) -> AppResult<Json<CreditsResponse>> {
    let ctx = RequestContext::resolve(&state, identity).await;
    let status = state
        .ledger
        .credit_status(ctx.identity.as_ref(), &ctx.tier, &guest_credits(&jar))
        .await?;
    Ok(Json(CreditsResponse {
        credits: status.remaining,
        used: status.used,
        limit: status.limit,
        tier: status.tier,
        is_guest: status.is_guest,
        timestamp: Utc::now().timestamp_millis(),
    }))
}
