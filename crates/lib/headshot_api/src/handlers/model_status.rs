//! `GET /api/model/status`

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::ModelStatusResponse;

pub async fn model_status_handler(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    let response = match state.orchestrator.model_name() {
        Some(model) => ModelStatusResponse {
            available: true,
            model: Some(model.to_string()),
            message: "Image model is configured and ready to use".into(),
        },
        None => ModelStatusResponse {
            available: false,
            model: None,
            message: "GEMINI_API_KEY is not set; sample images are served".into(),
        },
    };
    Json(response)
}
