//! `GET /api/health`

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HealthResponse;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (store, db_connected) = match &state.pool {
        Some(pool) => (
            "postgres",
            sqlx::query("SELECT 1").execute(pool).await.is_ok(),
        ),
        None => ("memory", false),
    };
    Json(HealthResponse {
        status: "ok".into(),
        version: headshot_core::version().into(),
        db_connected,
        store: store.into(),
    })
}
