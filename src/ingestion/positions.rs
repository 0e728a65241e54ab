use rust_decimal::Decimal;

use crate::intelligence::migration::gain_over_period;
use crate::models::{ChainId, PortfolioSnapshot, Position, PositionStatus};

const MS_PER_DAY: i64 = 86_400_000;

/// Assumed current APY (percent) for an asset with no known deployment.
pub fn default_apy(symbol: &str) -> Decimal {
    match symbol.to_uppercase().as_str() {
        "ETH" | "WETH" => Decimal::new(35, 1),
        "USDC" => Decimal::from(8),
        "USDT" => Decimal::new(75, 1),
        "DAI" => Decimal::from(7),
        _ => Decimal::from(5),
    }
}

/// One position per non-zero balance in the snapshot, all starting as optimal
/// until the ranker has seen their opportunities.
pub fn materialize_positions(snapshot: &PortfolioSnapshot) -> Vec<Position> {
    snapshot
        .balances
        .iter()
        .filter(|b| !b.is_zero())
        .map(|b| {
            let current_apy = default_apy(&b.asset_symbol);
            let days_deployed = days_active_on(snapshot, b.chain_id);
            Position {
                id: Position::make_id(b.chain_id, &b.asset_symbol),
                chain_id: b.chain_id,
                asset_symbol: b.asset_symbol.clone(),
                amount: b.amount,
                valuation_usd: b.valuation_usd,
                current_apy,
                status: PositionStatus::Optimal,
                days_deployed,
                total_earned_usd: gain_over_period(b.valuation_usd, current_apy, days_deployed),
            }
        })
        .collect()
}

/// Days since the oldest transaction on `chain`, 0 with no history there.
fn days_active_on(snapshot: &PortfolioSnapshot, chain: ChainId) -> i64 {
    let now_ms = snapshot.generated_at.timestamp_millis();
    snapshot
        .transactions_on(chain)
        .map(|t| t.timestamp_ms)
        .min()
        .map(|oldest| ((now_ms - oldest) / MS_PER_DAY).max(0))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::aggregator::aggregate_at;
    use crate::models::{BalanceRecord, TransactionRecord, TxKind};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    #[test]
    fn test_default_apy_table() {
        assert_eq!(default_apy("eth"), Decimal::new(35, 1));
        assert_eq!(default_apy("USDC"), Decimal::from(8));
        assert_eq!(default_apy("USDT"), Decimal::new(75, 1));
        assert_eq!(default_apy("DAI"), Decimal::from(7));
        assert_eq!(default_apy("LINK"), Decimal::from(5));
    }

    #[test]
    fn test_positions_from_snapshot() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let price = Decimal::from(2000);

        let mut balances = BTreeMap::new();
        balances.insert(
            ChainId::Ethereum,
            vec![BalanceRecord::valued(ChainId::Ethereum, "USDC", Decimal::from(3650), price)],
        );
        balances.insert(
            ChainId::Base,
            vec![BalanceRecord::valued(ChainId::Base, "ETH", Decimal::ONE, price)],
        );

        let transactions = vec![TransactionRecord {
            hash: "0x1".into(),
            chain_id: ChainId::Ethereum,
            from: "0xa".into(),
            to: "0xb".into(),
            value_native: Decimal::ZERO,
            timestamp_ms: now.timestamp_millis() - 100 * MS_PER_DAY,
            kind: TxKind::Sent,
            is_error: false,
            gas_used_native: Decimal::ZERO,
            input: String::new(),
        }];

        let snapshot = aggregate_at(balances, transactions, "0xa", now).unwrap();
        let positions = materialize_positions(&snapshot);
        assert_eq!(positions.len(), 2);

        let usdc = positions.iter().find(|p| p.id == "ethereum:USDC").unwrap();
        assert_eq!(usdc.days_deployed, 100);
        assert_eq!(usdc.current_apy, Decimal::from(8));
        // 3650 × 8% × 100/365 = 80
        assert_eq!(usdc.total_earned_usd, Decimal::from(80));

        let eth = positions.iter().find(|p| p.id == "base:ETH").unwrap();
        assert_eq!(eth.valuation_usd, Decimal::from(2000));
        assert_eq!(eth.days_deployed, 0);
        assert_eq!(eth.total_earned_usd, Decimal::ZERO);
    }
}
