use std::sync::Arc;
use std::time::Duration;

use yieldshift::api::router::create_router;
use yieldshift::config::AppConfig;
use yieldshift::{build_service, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    if config.use_sample_data {
        tracing::warn!("Serving the built-in sample dataset (USE_SAMPLE_DATA or no ALCHEMY_API_KEY)");
    }
    if config.api_token.is_none() {
        tracing::warn!("API_TOKEN is unset, /api routes are unauthenticated");
    }

    let metrics_handle = metrics::init_metrics()?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let service = build_service(&config, http)?;

    tracing::info!(
        ttl_secs = config.pool_cache_ttl_secs,
        eth_price_usd = %config.eth_price_usd,
        gas_price_gwei = %config.gas_price_gwei,
        "Portfolio service ready"
    );

    let state = AppState {
        config,
        service: Arc::new(service),
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
