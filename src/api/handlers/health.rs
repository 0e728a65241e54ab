use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let mode = if state.config.use_sample_data { "sample" } else { "live" };
    Json(json!({ "status": "healthy", "mode": mode }))
}
