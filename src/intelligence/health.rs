use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::models::{ChainId, PortfolioSnapshot};

/// Weight of each sub-factor in points out of 100.
pub const BALANCE_WEIGHT: f64 = 25.0;
pub const ACTIVITY_WEIGHT: f64 = 20.0;
pub const DIVERSITY_WEIGHT: f64 = 15.0;
pub const EXPERIENCE_WEIGHT: f64 = 15.0;
/// Floor awarded to every connected wallet, active or not.
pub const BASE_POINTS: f64 = 25.0;

/// Weighted contribution of each factor, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthBreakdown {
    pub balance: f64,
    pub activity: f64,
    pub diversity: f64,
    pub experience: f64,
    pub base: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub total: u8,
    pub breakdown: HealthBreakdown,
}

/// The scalar view of a snapshot the health formula consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthInputs {
    pub total_balance_native: f64,
    pub total_transactions: usize,
    pub recent_activity: usize,
    pub active_chains: usize,
    pub supported_chains: usize,
    pub wallet_age_days: i64,
    pub contract_interactions: usize,
}

impl HealthInputs {
    pub fn from_snapshot(snapshot: &PortfolioSnapshot) -> Self {
        Self {
            total_balance_native: snapshot.total_balance_native.to_f64().unwrap_or(0.0),
            total_transactions: snapshot.total_transactions,
            recent_activity: snapshot.recent_activity_count,
            active_chains: snapshot.active_chains().len(),
            supported_chains: ChainId::ALL.len(),
            wallet_age_days: snapshot.wallet_age_days,
            contract_interactions: snapshot.contract_interaction_count,
        }
    }
}

/// Score a snapshot 0–100.
pub fn score_health(snapshot: &PortfolioSnapshot) -> HealthScore {
    score_inputs(&HealthInputs::from_snapshot(snapshot))
}

pub fn score_inputs(inputs: &HealthInputs) -> HealthScore {
    let breakdown = HealthBreakdown {
        balance: balance_factor(inputs.total_balance_native) * BALANCE_WEIGHT,
        activity: activity_factor(inputs.recent_activity, inputs.total_transactions) * ACTIVITY_WEIGHT,
        diversity: diversity_factor(inputs.active_chains, inputs.supported_chains) * DIVERSITY_WEIGHT,
        experience: experience_factor(inputs.wallet_age_days, inputs.contract_interactions)
            * EXPERIENCE_WEIGHT,
        base: BASE_POINTS,
    };

    let sum = breakdown.balance
        + breakdown.activity
        + breakdown.diversity
        + breakdown.experience
        + breakdown.base;

    HealthScore {
        total: sum.clamp(0.0, 100.0).round() as u8,
        breakdown,
    }
}

// ---------------------------------------------------------------------------
// Factors (each 0–1)
// ---------------------------------------------------------------------------

/// `min(1, log10(balance × 10 + 1) / 2)`: saturates at 9.9 native units.
pub fn balance_factor(balance: f64) -> f64 {
    if balance <= 0.0 || !balance.is_finite() {
        return 0.0;
    }
    ((balance * 10.0 + 1.0).log10() / 2.0).min(1.0)
}

/// 60% recency ratio, 40% volume against a 50-transaction target.
pub fn activity_factor(recent: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let recency = recent as f64 / total as f64;
    let volume = (total as f64 / 50.0).min(1.0);
    (recency * 0.6 + volume * 0.4).min(1.0)
}

/// Share of supported chains holding native ETH.
pub fn diversity_factor(active: usize, supported: usize) -> f64 {
    if supported == 0 {
        return 0.0;
    }
    (active as f64 / supported as f64).min(1.0)
}

/// Half wallet age (log scale, one year saturates), half contract interactions (20 saturates).
pub fn experience_factor(age_days: i64, contract_interactions: usize) -> f64 {
    let age = age_days.max(0) as f64;
    let age_score = ((age + 1.0).log10() / 365f64.log10()).min(1.0);
    let contract_score = (contract_interactions as f64 / 20.0).min(1.0);
    age_score * 0.5 + contract_score * 0.5
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_inputs() -> HealthInputs {
        HealthInputs {
            total_balance_native: 0.0,
            total_transactions: 0,
            recent_activity: 0,
            active_chains: 0,
            supported_chains: 3,
            wallet_age_days: 0,
            contract_interactions: 0,
        }
    }

    #[test]
    fn test_empty_wallet_scores_base_floor() {
        let score = score_inputs(&empty_inputs());
        assert_eq!(score.total, 25);
        assert_eq!(score.breakdown.balance, 0.0);
        assert_eq!(score.breakdown.activity, 0.0);
        assert_eq!(score.breakdown.experience, 0.0);
    }

    #[test]
    fn test_hand_computed_fixture() {
        let inputs = HealthInputs {
            total_balance_native: 1.0,
            total_transactions: 52,
            recent_activity: 12,
            active_chains: 3,
            supported_chains: 3,
            wallet_age_days: 87,
            contract_interactions: 8,
        };
        let score = score_inputs(&inputs);

        // balance: log10(11)/2 × 25 ≈ 13.017
        assert!((score.breakdown.balance - 13.0174).abs() < 1e-3);
        // activity: (12/52 × 0.6 + 1 × 0.4) × 20 ≈ 10.769
        assert!((score.breakdown.activity - 10.7692).abs() < 1e-3);
        assert_eq!(score.breakdown.diversity, 15.0);
        // experience: (log10(88)/log10(365) × 0.5 + 0.4 × 0.5) × 15 ≈ 8.692
        assert!((score.breakdown.experience - 8.6916).abs() < 1e-3);
        // 72.478 rounds to 72
        assert_eq!(score.total, 72);
    }

    #[test]
    fn test_saturated_wallet_scores_100() {
        let inputs = HealthInputs {
            total_balance_native: 500.0,
            total_transactions: 200,
            recent_activity: 200,
            active_chains: 3,
            supported_chains: 3,
            wallet_age_days: 2_000,
            contract_interactions: 100,
        };
        assert_eq!(score_inputs(&inputs).total, 100);
    }

    #[test]
    fn test_diversity_counts_native_holdings_only() {
        use crate::ingestion::aggregate;
        use crate::models::BalanceRecord;
        use rust_decimal::Decimal;
        use std::collections::BTreeMap;

        let price = Decimal::from(2000);
        let mut balances = BTreeMap::new();
        balances.insert(
            ChainId::Ethereum,
            vec![BalanceRecord::valued(ChainId::Ethereum, "ETH", Decimal::ONE, price)],
        );
        balances.insert(
            ChainId::Arbitrum,
            vec![BalanceRecord::valued(ChainId::Arbitrum, "USDT", Decimal::from(5), price)],
        );
        let snapshot = aggregate(balances, Vec::new(), "0x742d35cc6634c0532925a3b844bc9e7595f0beb0").unwrap();

        let score = score_health(&snapshot);
        // one of three chains holds ETH
        assert!((score.breakdown.diversity - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_balance_curve_distinguishes_small_wallets() {
        assert!(balance_factor(0.01) < balance_factor(10.0));
        assert_eq!(balance_factor(9.9), 1.0);
        assert_eq!(balance_factor(-1.0), 0.0);
    }

    #[test]
    fn test_total_always_in_range() {
        for balance in [0.0, 0.001, 0.5, 3.0, 1e6] {
            for (recent, total) in [(0, 0), (0, 10), (5, 10), (60, 60)] {
                for active in 0..=3 {
                    for age in [0, 1, 30, 365, 10_000] {
                        let inputs = HealthInputs {
                            total_balance_native: balance,
                            total_transactions: total,
                            recent_activity: recent,
                            active_chains: active,
                            supported_chains: 3,
                            wallet_age_days: age,
                            contract_interactions: recent,
                        };
                        let score = score_inputs(&inputs);
                        assert!(score.total >= 25 && score.total <= 100);
                    }
                }
            }
        }
    }
}
