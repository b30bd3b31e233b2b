//! Subscription endpoints. Plan changes go through the billing provider, so
//! the update endpoint is permanently disabled.

use axum::Json;
use axum::extract::{Extension, State};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::SubscriptionStatusResponse;
use crate::services::context::RequestContext;

/// `GET /api/subscription/status`
pub async fn subscription_status_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
) -> AppResult<Json<SubscriptionStatusResponse>> {
    let ctx = RequestContext::resolve(&state, Some(identity)).await;
    let features = ctx.tier.features();
    Ok(Json(SubscriptionStatusResponse {
        tier: ctx.tier.tier,
        is_subscribed: ctx.tier.tier.is_paid(),
        max_generations: features.monthly_credits,
        quota: ctx.tier.quota,
        styles: ctx
            .tier
            .style_allowlist
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        custom_prompting: features.custom_prompting,
        history_access: features.history_access,
    }))
}

/// `POST /api/subscription/update`
pub async fn update_subscription_handler() -> AppError {
    AppError::Forbidden {
        code: "FEATURE_DISABLED",
        message: "This feature has been disabled. Please contact support to change your subscription."
            .into(),
    }
}
