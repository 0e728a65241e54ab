use futures_util::future::{BoxFuture, FutureExt, Shared};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::CoreError;
use crate::models::YieldPool;
use crate::providers::{ProviderError, YieldCatalog};

/// Pools paired with the instant the upstream fetch completed.
type PoolsResult = Result<(Arc<Vec<YieldPool>>, Instant), Arc<ProviderError>>;
type Refresh = Shared<BoxFuture<'static, PoolsResult>>;

struct CachedPools {
    pools: Arc<Vec<YieldPool>>,
    fetched_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entry: Option<CachedPools>,
    /// The refresh currently running, tagged with its generation.
    in_flight: Option<(u64, Refresh)>,
    generation: u64,
}

impl CacheState {
    fn store(&mut self, result: &PoolsResult) {
        if let Ok((pools, fetched_at)) = result {
            self.entry = Some(CachedPools {
                pools: pools.clone(),
                fetched_at: *fetched_at,
            });
        }
    }
}

/// TTL cache over the yield catalog.
///
/// Concurrent callers on a miss all await one shared refresh. A failed refresh
/// falls back to the previous catalog, however old; with nothing cached the
/// failure surfaces as `CoreError::SourceUnavailable`.
pub struct YieldPoolCache {
    catalog: Arc<dyn YieldCatalog>,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl YieldPoolCache {
    pub fn new(catalog: Arc<dyn YieldCatalog>, ttl: Duration) -> Self {
        Self {
            catalog,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_pools(&self) -> Result<Arc<Vec<YieldPool>>, CoreError> {
        let (generation, refresh) = {
            let mut state = self.state.lock().await;

            // Every waiter of a finished refresh was dropped before settling it.
            let finished = state.in_flight.as_ref().and_then(|(_, flight)| flight.peek().cloned());
            if let Some(result) = finished {
                state.in_flight = None;
                state.store(&result);
            }

            if let Some(entry) = &state.entry {
                if entry.fetched_at.elapsed() < self.ttl {
                    counter!("pool_cache_hits_total").increment(1);
                    return Ok(entry.pools.clone());
                }
            }

            match state.in_flight.clone() {
                Some(flight) => flight,
                None => {
                    state.generation += 1;
                    let generation = state.generation;
                    let refresh = self.start_refresh();
                    state.in_flight = Some((generation, refresh.clone()));
                    (generation, refresh)
                }
            }
        };

        // Never hold the lock across the refresh.
        let result = refresh.await;

        let mut state = self.state.lock().await;
        if matches!(&state.in_flight, Some((g, _)) if *g == generation) {
            state.in_flight = None;
            state.store(&result);
        }

        match result {
            Ok((pools, _)) => Ok(pools),
            Err(e) => match &state.entry {
                Some(entry) => {
                    tracing::warn!(
                        error = %e,
                        catalog = self.catalog.name(),
                        age_secs = entry.fetched_at.elapsed().as_secs(),
                        "Yield catalog refresh failed, serving stale pools"
                    );
                    counter!("pool_cache_stale_served_total").increment(1);
                    Ok(entry.pools.clone())
                }
                None => Err(CoreError::SourceUnavailable(format!(
                    "{} catalog: {e}",
                    self.catalog.name()
                ))),
            },
        }
    }

    fn start_refresh(&self) -> Refresh {
        let catalog = self.catalog.clone();
        async move {
            counter!("pool_cache_refreshes_total").increment(1);
            let started = Instant::now();
            let result = catalog.get_all_pools().await;
            match &result {
                Ok(pools) => tracing::info!(
                    catalog = catalog.name(),
                    pools = pools.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Yield catalog refreshed"
                ),
                Err(e) => tracing::warn!(catalog = catalog.name(), error = %e, "Yield catalog fetch failed"),
            }
            result
                .map(|pools| (Arc::new(pools), Instant::now()))
                .map_err(Arc::new)
        }
        .boxed()
        .shared()
    }
}
