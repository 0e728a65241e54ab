use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::Decimal;
use std::sync::Arc;

use yieldshift::api::router::create_router;
use yieldshift::config::AppConfig;
use yieldshift::models::{BalanceRecord, ChainId, TransactionRecord, YieldPool};
use yieldshift::providers::{
    ActivityProvider, BalanceProvider, ProviderError, SampleActivity, SampleBalances, SampleCatalog,
    YieldCatalog,
};
use yieldshift::services::{OpportunityScorer, PortfolioService, ServiceSettings};
use yieldshift::AppState;

#[allow(dead_code)]
pub const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb1";

/// Offline config: sample providers, no auth, no remote scorer.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        ..AppConfig::default()
    }
}

#[allow(dead_code)]
pub fn build_test_app(config: AppConfig) -> axum::Router {
    // Per-app recorder, never installed globally.
    let metrics_handle = PrometheusBuilder::new().build_recorder().handle();
    let service = sample_service();

    create_router(AppState {
        config,
        service: Arc::new(service),
        metrics_handle,
    })
}

#[allow(dead_code)]
pub fn sample_service() -> PortfolioService {
    service_with(
        Arc::new(SampleBalances::new(Decimal::from(2000))),
        Arc::new(SampleActivity),
        Arc::new(SampleCatalog),
    )
}

#[allow(dead_code)]
pub fn service_with(
    balances: Arc<dyn BalanceProvider>,
    activity: Arc<dyn ActivityProvider>,
    catalog: Arc<dyn YieldCatalog>,
) -> PortfolioService {
    PortfolioService::new(
        balances,
        activity,
        catalog,
        OpportunityScorer::local(),
        ServiceSettings::default(),
    )
}

/// Wallet with nothing on any chain.
#[allow(dead_code)]
pub struct EmptyWallet;

#[async_trait]
impl BalanceProvider for EmptyWallet {
    fn name(&self) -> &'static str {
        "empty"
    }

    async fn get_balances(&self, _address: &str, _chain: ChainId) -> Result<Vec<BalanceRecord>, ProviderError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl ActivityProvider for EmptyWallet {
    fn name(&self) -> &'static str {
        "empty"
    }

    async fn get_transactions(
        &self,
        _address: &str,
        _chain: ChainId,
        _limit: u32,
    ) -> Result<Vec<TransactionRecord>, ProviderError> {
        Ok(Vec::new())
    }
}

/// Sample data, except the listed chains fail every call.
#[allow(dead_code)]
pub struct FlakyChains {
    pub down: Vec<ChainId>,
    pub inner: SampleBalances,
}

#[async_trait]
impl BalanceProvider for FlakyChains {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn get_balances(&self, address: &str, chain: ChainId) -> Result<Vec<BalanceRecord>, ProviderError> {
        if self.down.contains(&chain) {
            return Err(ProviderError::Rpc(format!("{chain} node unreachable")));
        }
        self.inner.get_balances(address, chain).await
    }
}

/// Fixed balances regardless of address.
#[allow(dead_code)]
pub struct FixedBalances(pub Vec<BalanceRecord>);

#[async_trait]
impl BalanceProvider for FixedBalances {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn get_balances(&self, _address: &str, chain: ChainId) -> Result<Vec<BalanceRecord>, ProviderError> {
        Ok(self.0.iter().filter(|b| b.chain_id == chain).cloned().collect())
    }
}

#[allow(dead_code)]
pub struct FixedCatalog(pub Vec<YieldPool>);

#[async_trait]
impl YieldCatalog for FixedCatalog {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn get_all_pools(&self) -> Result<Vec<YieldPool>, ProviderError> {
        Ok(self.0.clone())
    }
}

#[allow(dead_code)]
pub struct DownCatalog;

#[async_trait]
impl YieldCatalog for DownCatalog {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn get_all_pools(&self) -> Result<Vec<YieldPool>, ProviderError> {
        Err(ProviderError::Unexpected("catalog offline".into()))
    }
}

#[allow(dead_code)]
pub fn pool(protocol: &str, chain: ChainId, symbol: &str, apy: Decimal) -> YieldPool {
    YieldPool {
        protocol_name: protocol.into(),
        chain_id: chain,
        asset_symbol: symbol.into(),
        apy,
        tvl_usd: Decimal::from(10_000_000),
        pool_id: format!("{protocol}-{}-{symbol}", chain.slug()),
    }
}
