use axum::extract::State;
use axum::Json;

use super::ApiResponse;
use crate::models::YieldPool;
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Json<ApiResponse<Vec<YieldPool>>> {
    let pools = state.service.get_pools().await;
    Json(ApiResponse::ok(pools.as_ref().clone()))
}
