pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod ingestion;
pub mod intelligence;
pub mod providers;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::providers::{
    ActivityProvider, AlchemyClient, BalanceProvider, DefiLlamaClient, EtherscanClient,
    RemoteScorerClient, SampleActivity, SampleBalances, SampleCatalog, YieldCatalog,
};
use crate::services::{OpportunityScorer, PortfolioService, ServiceSettings};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub service: Arc<PortfolioService>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

/// Wire the providers selected by `config` into a service facade.
pub fn build_service(config: &AppConfig, http: reqwest::Client) -> anyhow::Result<PortfolioService> {
    let (balances, activity, catalog): (
        Arc<dyn BalanceProvider>,
        Arc<dyn ActivityProvider>,
        Arc<dyn YieldCatalog>,
    ) = match (&config.alchemy_api_key, config.use_sample_data) {
        (Some(key), false) => (
            Arc::new(AlchemyClient::new(http.clone(), key.clone(), config.eth_price_usd)),
            Arc::new(EtherscanClient::new(http.clone(), config.etherscan_api_key.clone())),
            Arc::new(DefiLlamaClient::new(http.clone(), config.defillama_url.clone())),
        ),
        _ => (
            Arc::new(SampleBalances::new(config.eth_price_usd)),
            Arc::new(SampleActivity),
            Arc::new(SampleCatalog),
        ),
    };

    let scorer = match &config.remote_scorer_url {
        Some(url) => OpportunityScorer::with_remote(
            Arc::new(RemoteScorerClient::new(http, url.clone())),
            config.remote_scorer_timeout(),
        ),
        None => OpportunityScorer::local(),
    };

    tracing::info!(
        balances = balances.name(),
        activity = activity.name(),
        catalog = catalog.name(),
        remote_scorer = scorer.has_remote(),
        "Providers configured"
    );

    Ok(PortfolioService::new(
        balances,
        activity,
        catalog,
        scorer,
        ServiceSettings::from(config),
    ))
}
