use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Position, PositionStatus, YieldPool};

/// Migration cost inputs for one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    pub bridge_usd: Decimal,
    pub gas_usd: Decimal,
    /// Current gas price, compared against the 30 gwei reference.
    pub gas_price_gwei: Decimal,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            bridge_usd: Decimal::from(3),
            gas_usd: Decimal::ONE,
            gas_price_gwei: Decimal::from(25),
        }
    }
}

impl CostParams {
    pub fn total(&self) -> Decimal {
        self.bridge_usd + self.gas_usd
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationCosts {
    pub bridge: Decimal,
    pub gas: Decimal,
    pub total: Decimal,
}

impl From<&CostParams> for MigrationCosts {
    fn from(p: &CostParams) -> Self {
        Self {
            bridge: p.bridge_usd,
            gas: p.gas_usd,
            total: p.total(),
        }
    }
}

/// Days of extra yield needed to recoup migration costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakeven {
    Days(Decimal),
    /// The daily gain is zero or negative; costs are never recouped.
    Never,
}

impl Breakeven {
    pub fn days(&self) -> Option<Decimal> {
        match self {
            Breakeven::Days(d) => Some(*d),
            Breakeven::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Breakeven::Never)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Local,
    Remote,
}

/// Result of scoring one (position, candidate pool) pair. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOpportunity {
    pub position_id: String,
    pub target_pool: YieldPool,
    pub apy_differential: Decimal,
    pub score: u8,
    pub costs: MigrationCosts,
    pub breakeven: Breakeven,
    pub annual_gain_usd: Decimal,
    pub protocol_safety_score: Decimal,
    pub source: ScoreSource,
}

/// Per-position roll-up produced by the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSummary {
    pub position: Position,
    pub best_score: Option<u8>,
    pub status: PositionStatus,
    /// 0–100 where 100 means no meaningful yield is being missed.
    pub health: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedOpportunities {
    /// Each bucket sorted by score, best first.
    pub by_position: BTreeMap<String, Vec<ScoredOpportunity>>,
    pub positions: Vec<PositionSummary>,
    pub portfolio_potential_gain_usd: Decimal,
    pub current_annual_yield_usd: Decimal,
    pub potential_annual_yield_usd: Decimal,
    pub underperforming_count: usize,
    pub portfolio_health: u8,
}

impl RankedOpportunities {
    pub fn best_for(&self, position_id: &str) -> Option<&ScoredOpportunity> {
        self.by_position.get(position_id).and_then(|b| b.first())
    }

    pub fn total_opportunities(&self) -> usize {
        self.by_position.values().map(Vec::len).sum()
    }
}
