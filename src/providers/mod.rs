pub mod alchemy;
pub mod defillama;
pub mod etherscan;
pub mod remote_scorer;
pub mod sample;
pub mod types;
pub mod units;

pub use alchemy::AlchemyClient;
pub use defillama::DefiLlamaClient;
pub use etherscan::EtherscanClient;
pub use remote_scorer::RemoteScorerClient;
pub use sample::{sample_pools, SampleActivity, SampleBalances, SampleCatalog};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    BalanceRecord, ChainId, CostParams, Position, ScoredOpportunity, TransactionRecord, YieldPool,
};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("unexpected response: {0}")]
    Unexpected(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("request timed out")]
    Timeout,
}

/// Source of per-chain balances. One chain per call so a failing chain never
/// takes the others down with it.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_balances(
        &self,
        address: &str,
        chain: ChainId,
    ) -> Result<Vec<BalanceRecord>, ProviderError>;
}

/// Source of per-chain transaction history. Order of the result is not relied upon.
#[async_trait]
pub trait ActivityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_transactions(
        &self,
        address: &str,
        chain: ChainId,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, ProviderError>;
}

/// The external yield catalog, fetched wholesale.
#[async_trait]
pub trait YieldCatalog: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_all_pools(&self) -> Result<Vec<YieldPool>, ProviderError>;
}

/// Optional external scoring service with the same contract as the local scorer.
#[async_trait]
pub trait RemoteScorer: Send + Sync {
    async fn score_remote(
        &self,
        position: &Position,
        candidate: &YieldPool,
        params: &CostParams,
    ) -> Result<ScoredOpportunity, ProviderError>;

    /// Cheap reachability check before a batch. Assumed reachable by default.
    async fn is_available(&self) -> bool {
        true
    }

    /// Score many pairs, results in input order. Defaults to one call per pair.
    async fn score_batch(
        &self,
        pairs: &[(&Position, &YieldPool)],
        params: &CostParams,
    ) -> Result<Vec<ScoredOpportunity>, ProviderError> {
        let mut scored = Vec::with_capacity(pairs.len());
        for (position, candidate) in pairs {
            scored.push(self.score_remote(position, candidate, params).await?);
        }
        Ok(scored)
    }
}
