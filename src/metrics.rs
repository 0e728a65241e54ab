use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// Pre-register counters so they appear even before the first increment.
pub fn register_metrics() {
    counter!("chain_fetch_failures_total").absolute(0);
    counter!("pool_cache_hits_total").absolute(0);
    counter!("pool_cache_refreshes_total").absolute(0);
    counter!("pool_cache_stale_served_total").absolute(0);
    counter!("remote_score_fallbacks_total").absolute(0);
    counter!("opportunities_scored_total").absolute(0);

    // Histogram is lazily created on first record; force creation.
    histogram!("portfolio_fetch_seconds").record(0.0);
}
