use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;

use super::types::{
    BatchScoreRequest, BatchScoreResponse, ScoreRequest, ScoreRequestPosition, ScoreRequestTarget,
    ScoreResponse,
};
use super::{ProviderError, RemoteScorer};
use crate::intelligence::migration::net_annual_gain;
use crate::models::{
    safety_score_for, Breakeven, CostParams, MigrationCosts, Position, ScoreSource,
    ScoredOpportunity, YieldPool,
};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for an external scoring service exposing `GET /health`,
/// `POST /api/score` and `POST /api/batch-score`.
#[derive(Debug, Clone)]
pub struct RemoteScorerClient {
    http: Client,
    base_url: String,
}

impl RemoteScorerClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RemoteScorer for RemoteScorerClient {
    async fn score_remote(
        &self,
        position: &Position,
        candidate: &YieldPool,
        params: &CostParams,
    ) -> Result<ScoredOpportunity, ProviderError> {
        let url = format!("{}/api/score", self.base_url);
        let body = build_request(position, candidate, params);

        let resp: ScoreResponse = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        from_response(position, candidate, params, &resp)
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::warn!(url = %url, status = %resp.status(), "Remote scorer unhealthy");
                false
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Remote scorer unreachable");
                false
            }
        }
    }

    async fn score_batch(
        &self,
        pairs: &[(&Position, &YieldPool)],
        params: &CostParams,
    ) -> Result<Vec<ScoredOpportunity>, ProviderError> {
        let url = format!("{}/api/batch-score", self.base_url);
        let body = BatchScoreRequest {
            opportunities: pairs
                .iter()
                .map(|(position, candidate)| build_request(position, candidate, params))
                .collect(),
        };

        let resp: BatchScoreResponse = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        from_batch_response(pairs, params, &resp)
    }
}

pub fn build_request(position: &Position, candidate: &YieldPool, params: &CostParams) -> ScoreRequest {
    ScoreRequest {
        current_position: ScoreRequestPosition {
            chain: position.chain_id.slug().to_string(),
            asset: position.asset_symbol.clone(),
            amount: to_f64(position.valuation_usd),
            current_apy: to_f64(position.current_apy),
        },
        target_opportunity: ScoreRequestTarget {
            protocol: candidate.protocol_name.clone(),
            chain: candidate.chain_id.slug().to_string(),
            target_apy: to_f64(candidate.apy),
            protocol_safety_score: to_f64(safety_score_for(&candidate.protocol_name)),
        },
        bridge_cost: to_f64(params.bridge_usd),
        gas_cost: to_f64(params.gas_usd),
    }
}

/// Map a remote response onto the local result shape. Fields the service omits
/// are filled the way the local scorer would fill them.
pub fn from_response(
    position: &Position,
    candidate: &YieldPool,
    params: &CostParams,
    resp: &ScoreResponse,
) -> Result<ScoredOpportunity, ProviderError> {
    if !resp.score.is_finite() {
        return Err(ProviderError::Unexpected(format!("non-finite score {}", resp.score)));
    }
    let score = resp.score.round().clamp(0.0, 100.0) as u8;

    let costs = match &resp.costs {
        Some(c) => MigrationCosts {
            bridge: from_f64(c.bridge)?,
            gas: from_f64(c.gas)?,
            total: from_f64(c.total)?,
        },
        None => MigrationCosts::from(params),
    };

    let annual_gain_usd = match resp.annual_gain {
        Some(gain) => from_f64(gain)?,
        None => net_annual_gain(position.valuation_usd, position.current_apy, candidate.apy, costs.total),
    }
    .max(Decimal::ZERO);

    let breakeven = match resp.breakeven {
        Some(days) if days.is_finite() && days >= 0.0 => Breakeven::Days(from_f64(days)?),
        _ => Breakeven::Never,
    };

    Ok(ScoredOpportunity {
        position_id: position.id.clone(),
        target_pool: candidate.clone(),
        apy_differential: candidate.apy - position.current_apy,
        score,
        costs,
        breakeven,
        annual_gain_usd,
        protocol_safety_score: safety_score_for(&candidate.protocol_name),
        source: ScoreSource::Remote,
    })
}

/// Pair batch results with their requests by position. A short or long batch is an error.
pub fn from_batch_response(
    pairs: &[(&Position, &YieldPool)],
    params: &CostParams,
    resp: &BatchScoreResponse,
) -> Result<Vec<ScoredOpportunity>, ProviderError> {
    if resp.scored_opportunities.len() != pairs.len() {
        return Err(ProviderError::Unexpected(format!(
            "batch returned {} scores for {} opportunities",
            resp.scored_opportunities.len(),
            pairs.len()
        )));
    }

    pairs
        .iter()
        .zip(&resp.scored_opportunities)
        .map(|((position, candidate), scored)| from_response(position, candidate, params, scored))
        .collect()
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn from_f64(v: f64) -> Result<Decimal, ProviderError> {
    Decimal::try_from(v).map_err(|e| ProviderError::Unexpected(format!("bad number {v}: {e}")))
}
