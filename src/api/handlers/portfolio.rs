use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::ApiResponse;
use crate::errors::AppError;
use crate::intelligence::{advise_all, HealthScore, OpportunityAdvice};
use crate::models::{PortfolioSnapshot, RankedOpportunities};
use crate::AppState;

#[derive(Serialize)]
pub struct OpportunitiesView {
    #[serde(flatten)]
    pub ranked: RankedOpportunities,
    pub advice: Vec<OpportunityAdvice>,
}

pub async fn snapshot(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<PortfolioSnapshot>>, AppError> {
    let snapshot = state.service.get_portfolio_snapshot(&address).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

pub async fn health(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<HealthScore>>, AppError> {
    let snapshot = state.service.get_portfolio_snapshot(&address).await?;
    Ok(Json(ApiResponse::ok(state.service.get_health_score(&snapshot))))
}

pub async fn opportunities(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<OpportunitiesView>>, AppError> {
    let snapshot = state.service.get_portfolio_snapshot(&address).await?;
    let ranked = state.service.get_scored_opportunities(&snapshot).await;
    let advice = advise_all(&ranked);
    Ok(Json(ApiResponse::ok(OpportunitiesView { ranked, advice })))
}
