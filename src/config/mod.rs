use rust_decimal::Decimal;
use std::env;
use std::time::Duration;

use crate::models::CostParams;

const DEFAULT_DEFILLAMA_URL: &str = "https://yields.llama.fi";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Provider credentials, injected into adapters
    pub alchemy_api_key: Option<String>,
    pub etherscan_api_key: Option<String>,
    pub defillama_url: String,

    // Demo mode: serve the fixed sample dataset through the same provider traits
    pub use_sample_data: bool,

    // Yield pool cache
    pub pool_cache_ttl_secs: u64,

    // Remote scoring service
    pub remote_scorer_url: Option<String>,
    pub remote_scorer_timeout_ms: u64,

    // Valuation and migration cost assumptions
    pub eth_price_usd: Decimal,
    pub bridge_cost_usd: Decimal,
    pub gas_cost_usd: Decimal,
    pub gas_price_gwei: Decimal,

    pub tx_limit_per_chain: u32,

    // Bearer token for /api/* (unset disables auth)
    pub api_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            alchemy_api_key: None,
            etherscan_api_key: None,
            defillama_url: DEFAULT_DEFILLAMA_URL.into(),
            use_sample_data: true,
            pool_cache_ttl_secs: 300,
            remote_scorer_url: None,
            remote_scorer_timeout_ms: 5_000,
            eth_price_usd: Decimal::from(2_000),
            bridge_cost_usd: Decimal::from(3),
            gas_cost_usd: Decimal::ONE,
            gas_price_gwei: Decimal::from(25),
            tx_limit_per_chain: 50,
            api_token: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let alchemy_api_key = non_empty(env::var("ALCHEMY_API_KEY").ok());

        let sample_requested = env::var("USE_SAMPLE_DATA")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .unwrap_or(false);

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            use_sample_data: sample_requested || alchemy_api_key.is_none(),
            alchemy_api_key,
            etherscan_api_key: non_empty(env::var("ETHERSCAN_API_KEY").ok()),
            defillama_url: env::var("DEFILLAMA_URL").unwrap_or(defaults.defillama_url),

            pool_cache_ttl_secs: env::var("POOL_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.pool_cache_ttl_secs),

            remote_scorer_url: non_empty(env::var("REMOTE_SCORER_URL").ok()),
            remote_scorer_timeout_ms: env::var("REMOTE_SCORER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.remote_scorer_timeout_ms),

            eth_price_usd: decimal_var("ETH_PRICE_USD", defaults.eth_price_usd),
            bridge_cost_usd: decimal_var("BRIDGE_COST_USD", defaults.bridge_cost_usd),
            gas_cost_usd: decimal_var("GAS_COST_USD", defaults.gas_cost_usd),
            gas_price_gwei: decimal_var("GAS_PRICE_GWEI", defaults.gas_price_gwei),

            tx_limit_per_chain: env::var("TX_LIMIT_PER_CHAIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tx_limit_per_chain),

            api_token: non_empty(env::var("API_TOKEN").ok()),
        })
    }

    pub fn pool_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.pool_cache_ttl_secs)
    }

    pub fn remote_scorer_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_scorer_timeout_ms)
    }

    pub fn cost_params(&self) -> CostParams {
        CostParams {
            bridge_usd: self.bridge_cost_usd,
            gas_usd: self.gas_cost_usd,
            gas_price_gwei: self.gas_price_gwei,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn decimal_var(key: &str, default: Decimal) -> Decimal {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.pool_cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.remote_scorer_timeout(), Duration::from_secs(5));

        let params = config.cost_params();
        assert_eq!(params.total(), Decimal::from(4));
        assert_eq!(params.gas_price_gwei, Decimal::from(25));
    }

    #[test]
    fn test_non_empty_filters_blank_values() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" key ".into())), Some("key".into()));
        assert_eq!(non_empty(None), None);
    }
}
