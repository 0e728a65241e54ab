use alloy::primitives::Address;
use metrics::histogram;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::pool_cache::YieldPoolCache;
use super::scoring::OpportunityScorer;
use crate::config::AppConfig;
use crate::errors::CoreError;
use crate::ingestion::{aggregate, fetch_all_chains, fold_results, materialize_positions};
use crate::intelligence::{match_candidates, rank, score_health, HealthScore};
use crate::models::{ChainId, CostParams, PortfolioSnapshot, RankedOpportunities, YieldPool};
use crate::providers::sample::sample_pools;
use crate::providers::{ActivityProvider, BalanceProvider, YieldCatalog};

/// Tunables the facade needs from the application config.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub chains: Vec<ChainId>,
    pub tx_limit_per_chain: u32,
    pub pool_cache_ttl: Duration,
    pub cost_params: CostParams,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ServiceSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            chains: ChainId::ALL.to_vec(),
            tx_limit_per_chain: config.tx_limit_per_chain,
            pool_cache_ttl: config.pool_cache_ttl(),
            cost_params: config.cost_params(),
        }
    }
}

/// Entry point for presentation layers: snapshot, health and ranked opportunities.
pub struct PortfolioService {
    balances: Arc<dyn BalanceProvider>,
    activity: Arc<dyn ActivityProvider>,
    pool_cache: YieldPoolCache,
    scorer: OpportunityScorer,
    settings: ServiceSettings,
}

impl PortfolioService {
    pub fn new(
        balances: Arc<dyn BalanceProvider>,
        activity: Arc<dyn ActivityProvider>,
        catalog: Arc<dyn YieldCatalog>,
        scorer: OpportunityScorer,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            balances,
            activity,
            pool_cache: YieldPoolCache::new(catalog, settings.pool_cache_ttl),
            scorer,
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Fetch every chain concurrently and aggregate. Failing chains contribute
    /// nothing; only an invalid address is an error.
    pub async fn get_portfolio_snapshot(&self, address: &str) -> Result<PortfolioSnapshot, CoreError> {
        let address = validate_address(address)?;
        let started = Instant::now();

        let results = fetch_all_chains(
            self.balances.as_ref(),
            self.activity.as_ref(),
            address,
            &self.settings.chains,
            self.settings.tx_limit_per_chain,
        )
        .await;
        let fetched = fold_results(results, self.balances.name(), self.activity.name());
        let snapshot = aggregate(fetched.balances_by_chain, fetched.transactions, address)?;

        histogram!("portfolio_fetch_seconds").record(started.elapsed().as_secs_f64());
        tracing::info!(
            address = %snapshot.address,
            balances = snapshot.balances.len(),
            transactions = snapshot.total_transactions,
            total_value_usd = %snapshot.total_value_usd,
            "Portfolio snapshot built"
        );
        Ok(snapshot)
    }

    pub fn get_health_score(&self, snapshot: &PortfolioSnapshot) -> HealthScore {
        score_health(snapshot)
    }

    /// The cached catalog, or the built-in sample pools when it has never loaded.
    pub async fn get_pools(&self) -> Arc<Vec<YieldPool>> {
        match self.pool_cache.get_pools().await {
            Ok(pools) => pools,
            Err(e) => {
                tracing::warn!(error = %e, "Yield catalog unavailable, using sample pools");
                Arc::new(sample_pools())
            }
        }
    }

    /// Match, score and rank migrations for every position in the snapshot.
    pub async fn get_scored_opportunities(&self, snapshot: &PortfolioSnapshot) -> RankedOpportunities {
        let positions = materialize_positions(snapshot);
        if positions.is_empty() {
            return rank(Vec::new(), &positions);
        }

        let pools = self.get_pools().await;
        let pairs: Vec<_> = positions
            .iter()
            .map(|p| (p.clone(), match_candidates(p, &pools)))
            .collect();

        let scored = self.scorer.score_all(&pairs, &self.settings.cost_params).await;
        let ranked = rank(scored, &positions);

        tracing::info!(
            address = %snapshot.address,
            positions = positions.len(),
            opportunities = ranked.total_opportunities(),
            potential_gain_usd = %ranked.portfolio_potential_gain_usd,
            remote_scoring = self.scorer.has_remote(),
            "Opportunities ranked"
        );
        ranked
    }
}

/// Trimmed `0x` + 40 hex address, or `InvalidInput`.
pub fn validate_address(address: &str) -> Result<&str, CoreError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(CoreError::InvalidInput("wallet address is required".into()));
    }
    if !address.starts_with("0x") || Address::from_str(address).is_err() {
        return Err(CoreError::InvalidInput(format!("invalid wallet address: {address}")));
    }
    Ok(address)
}
