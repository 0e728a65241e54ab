use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::{
    ActivityLevel, BalanceRecord, ChainBalance, ChainId, PortfolioSnapshot, TransactionRecord, TxKind,
};

const MS_PER_DAY: i64 = 86_400_000;
/// Window counted as recent activity.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Build a snapshot from already-fetched per-chain data.
///
/// A chain missing from `balances_by_chain` contributes nothing, exactly like a
/// chain that returned an empty list.
pub fn aggregate(
    balances_by_chain: BTreeMap<ChainId, Vec<BalanceRecord>>,
    transactions: Vec<TransactionRecord>,
    address: &str,
) -> Result<PortfolioSnapshot, CoreError> {
    aggregate_at(balances_by_chain, transactions, address, Utc::now())
}

pub fn aggregate_at(
    balances_by_chain: BTreeMap<ChainId, Vec<BalanceRecord>>,
    mut transactions: Vec<TransactionRecord>,
    address: &str,
    now: DateTime<Utc>,
) -> Result<PortfolioSnapshot, CoreError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(CoreError::InvalidInput("wallet address is required".into()));
    }

    let balances: Vec<BalanceRecord> = balances_by_chain
        .into_values()
        .flatten()
        .filter(|b| !b.is_zero())
        .collect();

    let balance_by_chain: Vec<ChainBalance> = ChainId::ALL
        .iter()
        .map(|&chain_id| ChainBalance {
            chain_id,
            native_balance: balances
                .iter()
                .filter(|b| b.chain_id == chain_id && b.is_native())
                .map(|b| b.amount)
                .sum(),
        })
        .collect();

    let total_balance_native = balance_by_chain.iter().map(|c| c.native_balance).sum();
    let total_value_usd = balances.iter().map(|b| b.valuation_usd).sum();

    transactions.sort_by(TransactionRecord::merge_order);

    let now_ms = now.timestamp_millis();
    let wallet_age_days = transactions
        .iter()
        .map(|t| t.timestamp_ms)
        .min()
        .map(|oldest| ((now_ms - oldest) / MS_PER_DAY).max(0))
        .unwrap_or(0);

    let recent_activity_count = transactions
        .iter()
        .filter(|t| now_ms - t.timestamp_ms <= RECENT_WINDOW_DAYS * MS_PER_DAY)
        .count();
    let contract_interaction_count = transactions
        .iter()
        .filter(|t| t.is_contract_interaction())
        .count();
    let sent_count = transactions.iter().filter(|t| t.kind == TxKind::Sent).count();
    let received_count = transactions.iter().filter(|t| t.kind == TxKind::Received).count();
    let total_gas_spent_native: Decimal = transactions.iter().map(|t| t.gas_used_native).sum();

    tracing::debug!(
        address = %address,
        balances = balances.len(),
        transactions = transactions.len(),
        "Aggregated portfolio snapshot"
    );

    Ok(PortfolioSnapshot {
        address: address.to_string(),
        total_transactions: transactions.len(),
        balances,
        transactions,
        balance_by_chain,
        total_balance_native,
        total_value_usd,
        wallet_age_days,
        recent_activity_count,
        contract_interaction_count,
        sent_count,
        received_count,
        total_gas_spent_native,
        activity_level: ActivityLevel::from_recent_count(recent_activity_count),
        generated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const WALLET: &str = "0x1111111111111111111111111111111111111111";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn tx(hash: &str, chain: ChainId, days_ago: i64, kind: TxKind, input: &str) -> TransactionRecord {
        TransactionRecord {
            hash: hash.into(),
            chain_id: chain,
            from: WALLET.into(),
            to: "0x2222222222222222222222222222222222222222".into(),
            value_native: Decimal::ONE,
            timestamp_ms: now().timestamp_millis() - days_ago * MS_PER_DAY,
            kind,
            is_error: false,
            gas_used_native: Decimal::new(1, 3),
            input: input.into(),
        }
    }

    fn balances() -> BTreeMap<ChainId, Vec<BalanceRecord>> {
        let price = Decimal::from(2000);
        let mut map = BTreeMap::new();
        map.insert(
            ChainId::Ethereum,
            vec![
                BalanceRecord::valued(ChainId::Ethereum, "ETH", Decimal::new(15, 1), price),
                BalanceRecord::valued(ChainId::Ethereum, "USDC", Decimal::from(500), price),
                BalanceRecord::valued(ChainId::Ethereum, "DAI", Decimal::ZERO, price),
            ],
        );
        map.insert(
            ChainId::Base,
            vec![BalanceRecord::valued(ChainId::Base, "ETH", Decimal::new(5, 1), price)],
        );
        map
    }

    #[test]
    fn test_totals_count_native_only() {
        let snapshot = aggregate_at(balances(), Vec::new(), WALLET, now()).unwrap();

        assert_eq!(snapshot.total_balance_native, Decimal::from(2));
        assert_eq!(snapshot.total_value_usd, Decimal::from(4500));
        // zero DAI pruned
        assert_eq!(snapshot.balances.len(), 3);
        assert_eq!(snapshot.balance_by_chain.len(), 3);
        assert_eq!(snapshot.balance_by_chain[2].native_balance, Decimal::ZERO);
        assert_eq!(snapshot.active_chains(), vec![ChainId::Ethereum, ChainId::Base]);
    }

    #[test]
    fn test_token_only_chain_is_not_active() {
        let price = Decimal::from(2000);
        let mut map = BTreeMap::new();
        map.insert(
            ChainId::Ethereum,
            vec![BalanceRecord::valued(ChainId::Ethereum, "ETH", Decimal::ONE, price)],
        );
        map.insert(
            ChainId::Arbitrum,
            vec![BalanceRecord::valued(ChainId::Arbitrum, "USDT", Decimal::from(5), price)],
        );
        let snapshot = aggregate_at(map, Vec::new(), WALLET, now()).unwrap();

        assert_eq!(snapshot.balances.len(), 2);
        assert_eq!(snapshot.active_chains(), vec![ChainId::Ethereum]);
    }

    #[test]
    fn test_activity_statistics() {
        let transactions = vec![
            tx("0xa", ChainId::Ethereum, 100, TxKind::Sent, "0x"),
            tx("0xb", ChainId::Base, 30, TxKind::Contract, "0xa9059cbb"),
            tx("0xc", ChainId::Arbitrum, 31, TxKind::Received, "0x"),
            tx("0xd", ChainId::Ethereum, 1, TxKind::Contract, "0x095ea7b3"),
        ];
        let snapshot = aggregate_at(BTreeMap::new(), transactions, WALLET, now()).unwrap();

        assert_eq!(snapshot.wallet_age_days, 100);
        assert_eq!(snapshot.total_transactions, 4);
        // exactly 30 days counts as recent
        assert_eq!(snapshot.recent_activity_count, 2);
        assert_eq!(snapshot.contract_interaction_count, 2);
        assert_eq!(snapshot.sent_count, 1);
        assert_eq!(snapshot.received_count, 1);
        assert_eq!(snapshot.total_gas_spent_native, Decimal::new(4, 3));
        assert_eq!(snapshot.activity_level, ActivityLevel::Low);
        assert_eq!(snapshot.transactions[0].hash, "0xd");
    }

    #[test]
    fn test_ties_ordered_by_chain_priority() {
        let transactions = vec![
            tx("0x1", ChainId::Arbitrum, 2, TxKind::Sent, "0x"),
            tx("0x2", ChainId::Ethereum, 2, TxKind::Sent, "0x"),
            tx("0x3", ChainId::Base, 2, TxKind::Sent, "0x"),
        ];
        let snapshot = aggregate_at(BTreeMap::new(), transactions, WALLET, now()).unwrap();
        let chains: Vec<ChainId> = snapshot.transactions.iter().map(|t| t.chain_id).collect();
        assert_eq!(chains, vec![ChainId::Ethereum, ChainId::Base, ChainId::Arbitrum]);
    }

    #[test]
    fn test_empty_inputs_yield_zeroed_snapshot() {
        let snapshot = aggregate_at(BTreeMap::new(), Vec::new(), WALLET, now()).unwrap();
        assert_eq!(snapshot.total_balance_native, Decimal::ZERO);
        assert_eq!(snapshot.wallet_age_days, 0);
        assert_eq!(snapshot.recent_activity_count, 0);
        assert!(snapshot.balances.is_empty());
    }

    #[test]
    fn test_missing_address_is_invalid_input() {
        let err = aggregate_at(BTreeMap::new(), Vec::new(), "  ", now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }
}
