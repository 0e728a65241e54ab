use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BalanceRecord, ChainId, TransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    High,
    Medium,
    Low,
}

impl ActivityLevel {
    pub fn from_recent_count(recent: usize) -> Self {
        if recent > 10 {
            ActivityLevel::High
        } else if recent > 3 {
            ActivityLevel::Medium
        } else {
            ActivityLevel::Low
        }
    }
}

/// Native balance held on one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainBalance {
    pub chain_id: ChainId,
    pub native_balance: Decimal,
}

/// Cross-chain view of a wallet. Built fresh per request and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub address: String,
    /// One record per chain × asset, zero amounts pruned.
    pub balances: Vec<BalanceRecord>,
    /// Newest first, deterministic across chains.
    pub transactions: Vec<TransactionRecord>,
    pub balance_by_chain: Vec<ChainBalance>,
    pub total_balance_native: Decimal,
    pub total_value_usd: Decimal,
    pub wallet_age_days: i64,
    pub total_transactions: usize,
    pub recent_activity_count: usize,
    pub contract_interaction_count: usize,
    pub sent_count: usize,
    pub received_count: usize,
    pub total_gas_spent_native: Decimal,
    pub activity_level: ActivityLevel,
    pub generated_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    /// Chains holding native ETH. Token-only chains do not count.
    pub fn active_chains(&self) -> Vec<ChainId> {
        self.balance_by_chain
            .iter()
            .filter(|c| c.native_balance > Decimal::ZERO)
            .map(|c| c.chain_id)
            .collect()
    }

    pub fn transactions_on(&self, chain: ChainId) -> impl Iterator<Item = &TransactionRecord> {
        self.transactions.iter().filter(move |t| t.chain_id == chain)
    }
}
