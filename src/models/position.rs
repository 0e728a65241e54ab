use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ChainId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Optimal,
    Underperforming,
    Critical,
}

impl PositionStatus {
    /// Derive status from the best opportunity score, if any.
    pub fn from_best_score(best: Option<u8>) -> Self {
        match best {
            Some(s) if s >= 85 => PositionStatus::Critical,
            Some(s) if s >= 70 => PositionStatus::Underperforming,
            _ => PositionStatus::Optimal,
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionStatus::Optimal => write!(f, "optimal"),
            PositionStatus::Underperforming => write!(f, "underperforming"),
            PositionStatus::Critical => write!(f, "critical"),
        }
    }
}

/// A non-zero holding enriched with an assumed current APY (percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub chain_id: ChainId,
    pub asset_symbol: String,
    pub amount: Decimal,
    pub valuation_usd: Decimal,
    pub current_apy: Decimal,
    pub status: PositionStatus,
    pub days_deployed: i64,
    pub total_earned_usd: Decimal,
}

impl Position {
    pub fn make_id(chain: ChainId, symbol: &str) -> String {
        format!("{}:{}", chain.slug(), symbol.to_uppercase())
    }
}
