use metrics::counter;
use std::sync::Arc;
use std::time::Duration;

use crate::intelligence::score_opportunity;
use crate::models::{CostParams, Position, ScoredOpportunity, YieldPool};
use crate::providers::RemoteScorer;

/// Scores opportunities, preferring the remote service when one is configured.
///
/// Any remote error or timeout falls back to the local formula, so callers
/// always receive a `ScoredOpportunity`.
#[derive(Clone)]
pub struct OpportunityScorer {
    remote: Option<Arc<dyn RemoteScorer>>,
    timeout: Duration,
}

impl OpportunityScorer {
    pub fn local() -> Self {
        Self {
            remote: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn with_remote(remote: Arc<dyn RemoteScorer>, timeout: Duration) -> Self {
        Self {
            remote: Some(remote),
            timeout,
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn score(&self, position: &Position, candidate: &YieldPool, params: &CostParams) -> ScoredOpportunity {
        counter!("opportunities_scored_total").increment(1);

        let Some(remote) = &self.remote else {
            return score_opportunity(position, candidate, params);
        };

        let reason = match tokio::time::timeout(self.timeout, remote.score_remote(position, candidate, params)).await {
            Ok(Ok(scored)) if scored.position_id == position.id => return scored,
            Ok(Ok(scored)) => format!("response for wrong position {}", scored.position_id),
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}ms", self.timeout.as_millis()),
        };

        tracing::warn!(
            position_id = %position.id,
            pool_id = %candidate.pool_id,
            reason = %reason,
            "Remote scoring failed, using local formula"
        );
        counter!("remote_score_fallbacks_total").increment(1);
        score_opportunity(position, candidate, params)
    }

    /// Score every (position, candidate) pair, in input order.
    ///
    /// With a remote service the whole set goes out as one batch after a
    /// health check. An unhealthy service, a failed batch or a batch that does
    /// not line up with the request scores every pair locally.
    pub async fn score_all(
        &self,
        pairs: &[(Position, Vec<YieldPool>)],
        params: &CostParams,
    ) -> Vec<ScoredOpportunity> {
        let flat: Vec<(&Position, &YieldPool)> = pairs
            .iter()
            .flat_map(|(position, candidates)| candidates.iter().map(move |candidate| (position, candidate)))
            .collect();
        counter!("opportunities_scored_total").increment(flat.len() as u64);

        let Some(remote) = &self.remote else {
            return score_locally(&flat, params);
        };
        if flat.is_empty() {
            return Vec::new();
        }

        let available = tokio::time::timeout(self.timeout, remote.is_available())
            .await
            .unwrap_or(false);

        let reason = if !available {
            "service unavailable".to_string()
        } else {
            let batch_timeout = self.timeout * 2;
            match tokio::time::timeout(batch_timeout, remote.score_batch(&flat, params)).await {
                Ok(Ok(scored)) if lines_up(&flat, &scored) => return scored,
                Ok(Ok(scored)) => format!("batch of {} does not match {} requested", scored.len(), flat.len()),
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!("timed out after {}ms", batch_timeout.as_millis()),
            }
        };

        tracing::warn!(pairs = flat.len(), reason = %reason, "Remote batch scoring failed, using local formula");
        counter!("remote_score_fallbacks_total").increment(flat.len() as u64);
        score_locally(&flat, params)
    }
}

fn score_locally(pairs: &[(&Position, &YieldPool)], params: &CostParams) -> Vec<ScoredOpportunity> {
    pairs
        .iter()
        .map(|(position, candidate)| score_opportunity(position, candidate, params))
        .collect()
}

fn lines_up(pairs: &[(&Position, &YieldPool)], scored: &[ScoredOpportunity]) -> bool {
    pairs.len() == scored.len()
        && pairs
            .iter()
            .zip(scored)
            .all(|((position, candidate), s)| s.position_id == position.id && s.target_pool.pool_id == candidate.pool_id)
}
