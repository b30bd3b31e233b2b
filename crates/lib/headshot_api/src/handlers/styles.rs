//! `GET /api/styles`: styles the caller's plan may use.

use axum::Json;
use axum::extract::{Extension, State};

use crate::AppState;
use crate::middleware::auth::Caller;
use crate::models::{StyleInfo, StylesResponse};
use crate::services::context::RequestContext;

pub async fn styles_handler(
    State(state): State<AppState>,
    Extension(Caller(identity)): Extension<Caller>,
) -> Json<StylesResponse> {
    let ctx = RequestContext::resolve(&state, identity).await;
    let styles = ctx
        .tier
        .style_allowlist
        .iter()
        .map(|style| {
            let spec = style.spec();
            StyleInfo {
                id: style.as_str().into(),
                name: spec.name.into(),
                description: spec.description.into(),
            }
        })
        .collect();
    Json(StylesResponse {
        tier: ctx.tier.tier,
        is_guest: ctx.tier.is_guest,
        styles,
    })
}
