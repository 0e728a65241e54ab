use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;

use super::types::{LlamaPool, LlamaPoolsResponse};
use super::{ProviderError, YieldCatalog};
use crate::models::{lookup_protocol, ChainId, YieldPool};

/// Yield catalog backed by DefiLlama's `/pools` endpoint.
#[derive(Debug, Clone)]
pub struct DefiLlamaClient {
    http: Client,
    base_url: String,
}

impl DefiLlamaClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl YieldCatalog for DefiLlamaClient {
    fn name(&self) -> &'static str {
        "defillama"
    }

    async fn get_all_pools(&self) -> Result<Vec<YieldPool>, ProviderError> {
        let url = format!("{}/pools", self.base_url);
        let resp: LlamaPoolsResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let raw = resp
            .data
            .ok_or_else(|| ProviderError::Unexpected("pools response without data".into()))?;

        let total = raw.len();
        let pools = normalize_pools(&raw);
        tracing::debug!(total, kept = pools.len(), "Normalized yield catalog");
        Ok(pools)
    }
}

/// Keep single-asset pools of known protocols on supported chains.
pub fn normalize_pools(raw: &[LlamaPool]) -> Vec<YieldPool> {
    raw.iter().filter_map(normalize_pool).collect()
}

fn normalize_pool(pool: &LlamaPool) -> Option<YieldPool> {
    let project = pool.project.as_deref()?;
    lookup_protocol(project)?;

    let chain_id = ChainId::from_catalog_name(pool.chain.as_deref()?)?;

    let symbol = pool.symbol.as_deref()?.trim().to_uppercase();
    if symbol.is_empty() || symbol.contains('-') {
        return None;
    }

    // apy falls back to apyBase when missing or zero
    let apy = pool
        .apy
        .filter(|a| *a != 0.0)
        .or(pool.apy_base)
        .unwrap_or(0.0);
    if !apy.is_finite() || apy < 0.0 {
        return None;
    }

    let tvl = pool.tvl_usd.filter(|t| t.is_finite()).unwrap_or(0.0);

    Some(YieldPool {
        protocol_name: project.to_string(),
        chain_id,
        asset_symbol: symbol,
        apy: Decimal::try_from(apy).ok()?,
        tvl_usd: Decimal::try_from(tvl).unwrap_or(Decimal::ZERO),
        pool_id: pool
            .pool
            .clone()
            .unwrap_or_else(|| format!("{}-{}-{}", project, chain_id.slug(), pool.symbol.as_deref().unwrap_or_default())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::LlamaPoolsResponse;

    fn fixture() -> Vec<LlamaPool> {
        let json = serde_json::json!({
            "status": "success",
            "data": [
                { "pool": "p1", "project": "aave-v3", "chain": "Base", "symbol": "USDC", "apy": 6.2, "tvlUsd": 1200000.0 },
                { "pool": "p2", "project": "compound-v3", "chain": "Arbitrum", "symbol": "usdt", "apy": 0.0, "apyBase": 5.1, "tvlUsd": 800000.0 },
                { "pool": "p3", "project": "aave-v3", "chain": "Solana", "symbol": "USDC", "apy": 9.0, "tvlUsd": 1.0 },
                { "pool": "p4", "project": "random-farm", "chain": "Ethereum", "symbol": "USDC", "apy": 40.0, "tvlUsd": 1.0 },
                { "pool": "p5", "project": "curve-dex", "chain": "Ethereum", "symbol": "USDC-USDT", "apy": 3.0, "tvlUsd": 1.0 },
                { "pool": "p6", "project": "curve-dex", "chain": "Ethereum", "symbol": "DAI", "apy": null, "tvlUsd": null },
                { "pool": "p7", "project": "aave-v3", "chain": "Base", "symbol": "WETH", "apy": 8.0, "tvlUsd": 90000000.0 }
            ]
        });
        let resp: LlamaPoolsResponse = serde_json::from_value(json).unwrap();
        resp.data.unwrap()
    }

    #[test]
    fn test_normalize_filters_chain_protocol_and_pairs() {
        let pools = normalize_pools(&fixture());
        let ids: Vec<&str> = pools.iter().map(|p| p.pool_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p6", "p7"]);
    }

    #[test]
    fn test_normalize_apy_fallback_and_symbol_case() {
        let pools = normalize_pools(&fixture());
        let p2 = pools.iter().find(|p| p.pool_id == "p2").unwrap();
        assert_eq!(p2.asset_symbol, "USDT");
        assert_eq!(p2.chain_id, ChainId::Arbitrum);
        assert!((p2.apy - Decimal::new(51, 1)).abs() < Decimal::new(1, 9));

        let p6 = pools.iter().find(|p| p.pool_id == "p6").unwrap();
        assert_eq!(p6.apy, Decimal::ZERO);
        assert_eq!(p6.tvl_usd, Decimal::ZERO);
    }

    #[test]
    fn test_weth_pool_is_candidate_for_eth() {
        use crate::intelligence::match_candidates;
        use crate::models::{Position, PositionStatus};

        let position = Position {
            id: "ethereum:ETH".into(),
            chain_id: ChainId::Ethereum,
            asset_symbol: "ETH".into(),
            amount: Decimal::new(5, 1),
            valuation_usd: Decimal::from(1000),
            current_apy: Decimal::new(35, 1),
            status: PositionStatus::Optimal,
            days_deployed: 0,
            total_earned_usd: Decimal::ZERO,
        };

        let candidates = match_candidates(&position, &normalize_pools(&fixture()));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].pool_id, "p7");
        assert_eq!(candidates[0].asset_symbol, "WETH");
    }
}
