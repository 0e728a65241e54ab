use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    safety_score_for, Breakeven, CostParams, MigrationCosts, Position, ScoreSource,
    ScoredOpportunity, YieldPool,
};

/// Composite weights: APY differential 40%, safety 30%, cost 20%, timing 10%.
const APY_WEIGHT: Decimal = Decimal::from_parts(40, 0, 0, false, 2);
const SAFETY_WEIGHT: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
const COST_WEIGHT: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
const TIMING_WEIGHT: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Relative APY uplift multiplier. Must stay at exactly 5.
const APY_SCALE: i64 = 5;
/// Cost-as-percent-of-position penalty multiplier. Must stay at exactly 20.
const COST_PENALTY: i64 = 20;
/// Reference gas price in gwei for the timing factor.
const REFERENCE_GAS_GWEI: i64 = 30;

const DAYS_PER_YEAR: i64 = 365;

/// Score one (position, candidate) pair with the local formula.
pub fn score_opportunity(
    position: &Position,
    candidate: &YieldPool,
    params: &CostParams,
) -> ScoredOpportunity {
    let safety = safety_score_for(&candidate.protocol_name);
    let size = position.valuation_usd;
    let total_cost = params.total();

    let score = migration_score(
        position.current_apy,
        candidate.apy,
        safety,
        total_cost,
        size,
        params.gas_price_gwei,
    );

    let daily_gain = daily_yield(size, candidate.apy) - daily_yield(size, position.current_apy);

    ScoredOpportunity {
        position_id: position.id.clone(),
        target_pool: candidate.clone(),
        apy_differential: candidate.apy - position.current_apy,
        score,
        costs: MigrationCosts::from(params),
        breakeven: breakeven(total_cost, daily_gain),
        annual_gain_usd: net_annual_gain(size, position.current_apy, candidate.apy, total_cost)
            .max(Decimal::ZERO),
        protocol_safety_score: safety,
        source: ScoreSource::Local,
    }
}

/// Weighted composite, rounded and clamped to 0–100.
pub fn migration_score(
    current_apy: Decimal,
    target_apy: Decimal,
    protocol_safety: Decimal,
    total_cost: Decimal,
    position_size: Decimal,
    gas_price_gwei: Decimal,
) -> u8 {
    let weighted = apy_subscore(current_apy, target_apy) * APY_WEIGHT
        + safety_subscore(protocol_safety) * SAFETY_WEIGHT
        + cost_subscore(total_cost, position_size) * COST_WEIGHT
        + timing_subscore(gas_price_gwei) * TIMING_WEIGHT;

    let rounded = weighted.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    clamp_score(rounded).to_u8().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Sub-scores (each 0–100)
// ---------------------------------------------------------------------------

/// Relative uplift `(target - current) / current × 100 × 5`. Zero current APY scores 0.
pub fn apy_subscore(current_apy: Decimal, target_apy: Decimal) -> Decimal {
    if current_apy <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let relative_pct = (target_apy - current_apy) / current_apy * Decimal::ONE_HUNDRED;
    clamp_score(relative_pct * Decimal::from(APY_SCALE))
}

/// Protocol safety 0–10 scaled to 0–100.
pub fn safety_subscore(protocol_safety: Decimal) -> Decimal {
    protocol_safety * Decimal::TEN
}

/// `100 - (cost / size × 100) × 20`. A zero-sized position scores 0.
pub fn cost_subscore(total_cost: Decimal, position_size: Decimal) -> Decimal {
    if position_size <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let cost_pct = total_cost / position_size * Decimal::ONE_HUNDRED;
    clamp_score(Decimal::ONE_HUNDRED - cost_pct * Decimal::from(COST_PENALTY))
}

/// 100 at or below the reference gas price, decaying linearly to 0 at twice the reference.
pub fn timing_subscore(gas_price_gwei: Decimal) -> Decimal {
    let reference = Decimal::from(REFERENCE_GAS_GWEI);
    if gas_price_gwei <= reference {
        return Decimal::ONE_HUNDRED;
    }
    let excess = (gas_price_gwei - reference) / reference;
    (Decimal::ONE_HUNDRED - excess * Decimal::ONE_HUNDRED).max(Decimal::ZERO)
}

fn clamp_score(v: Decimal) -> Decimal {
    v.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

// ---------------------------------------------------------------------------
// Yield arithmetic
// ---------------------------------------------------------------------------

/// Yield earned per day on `principal` at `apy` percent.
pub fn daily_yield(principal: Decimal, apy: Decimal) -> Decimal {
    principal * apy / Decimal::from(100 * DAYS_PER_YEAR)
}

pub fn gain_over_period(principal: Decimal, apy: Decimal, days: i64) -> Decimal {
    principal * apy * Decimal::from(days) / Decimal::from(100 * DAYS_PER_YEAR)
}

/// Net one-year gain of moving, after costs. May be negative.
pub fn net_annual_gain(
    principal: Decimal,
    current_apy: Decimal,
    target_apy: Decimal,
    total_cost: Decimal,
) -> Decimal {
    gain_over_period(principal, target_apy, DAYS_PER_YEAR)
        - gain_over_period(principal, current_apy, DAYS_PER_YEAR)
        - total_cost
}

pub fn breakeven(total_cost: Decimal, daily_gain: Decimal) -> Breakeven {
    if daily_gain <= Decimal::ZERO {
        return Breakeven::Never;
    }
    Breakeven::Days(total_cost / daily_gain)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
