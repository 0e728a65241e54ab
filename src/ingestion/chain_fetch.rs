use futures_util::future::join_all;
use metrics::counter;
use std::collections::{BTreeMap, HashSet};

use crate::models::{BalanceRecord, ChainId, TransactionRecord};
use crate::providers::{ActivityProvider, BalanceProvider, ProviderError};

/// Raw per-chain results, before failures are folded away.
pub struct ChainResult {
    pub chain: ChainId,
    pub balances: Result<Vec<BalanceRecord>, ProviderError>,
    pub transactions: Result<Vec<TransactionRecord>, ProviderError>,
}

/// Everything fetched for one wallet, failed chains already degraded to empty.
#[derive(Debug, Default)]
pub struct FetchedPortfolio {
    pub balances_by_chain: BTreeMap<ChainId, Vec<BalanceRecord>>,
    /// Deduplicated on (chain, hash) and in merge order.
    pub transactions: Vec<TransactionRecord>,
}

/// Query every chain concurrently. Each chain's balance and activity calls run
/// side by side and neither waits on, nor cancels, any other chain.
pub async fn fetch_all_chains(
    balance_provider: &dyn BalanceProvider,
    activity_provider: &dyn ActivityProvider,
    address: &str,
    chains: &[ChainId],
    tx_limit: u32,
) -> Vec<ChainResult> {
    let calls = chains.iter().map(|&chain| async move {
        let (balances, transactions) = tokio::join!(
            balance_provider.get_balances(address, chain),
            activity_provider.get_transactions(address, chain, tx_limit),
        );
        ChainResult {
            chain,
            balances,
            transactions,
        }
    });
    join_all(calls).await
}

/// Fold per-chain results into plain data. A failed call contributes an empty
/// list and is only visible through logs and `chain_fetch_failures_total`.
pub fn fold_results(results: Vec<ChainResult>, balance_source: &str, activity_source: &str) -> FetchedPortfolio {
    let mut fetched = FetchedPortfolio::default();
    let mut all_transactions = Vec::new();

    for result in results {
        let balances = result.balances.unwrap_or_else(|e| {
            record_failure(result.chain, balance_source, "balances", &e);
            Vec::new()
        });
        fetched.balances_by_chain.insert(result.chain, balances);

        match result.transactions {
            Ok(txs) => all_transactions.extend(txs),
            Err(e) => record_failure(result.chain, activity_source, "transactions", &e),
        }
    }

    fetched.transactions = merge_transactions(all_transactions);
    fetched
}

/// Drop repeats of the same (chain, hash) and sort newest first.
pub fn merge_transactions(transactions: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<TransactionRecord> = transactions
        .into_iter()
        .filter(|t| seen.insert((t.chain_id, t.hash.to_lowercase())))
        .collect();
    merged.sort_by(TransactionRecord::merge_order);
    merged
}

fn record_failure(chain: ChainId, source: &str, kind: &'static str, error: &ProviderError) {
    tracing::warn!(
        chain = %chain,
        source = source,
        kind = kind,
        error = %error,
        "Chain fetch failed, continuing with empty data"
    );
    counter!("chain_fetch_failures_total", "chain" => chain.slug(), "kind" => kind).increment(1);
}
