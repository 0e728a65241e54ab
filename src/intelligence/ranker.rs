use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashSet};

use crate::models::{Position, PositionStatus, PositionSummary, RankedOpportunities, ScoredOpportunity};

/// Group scored opportunities by position and roll up the portfolio figures.
///
/// Opportunities referencing a position outside `positions` are dropped, as are
/// repeat scores for the same target pool (the higher score wins). Potential gain
/// counts only the top-ranked opportunity of each position.
pub fn rank(scored: Vec<ScoredOpportunity>, positions: &[Position]) -> RankedOpportunities {
    let known: HashSet<&str> = positions.iter().map(|p| p.id.as_str()).collect();

    let mut by_position: BTreeMap<String, Vec<ScoredOpportunity>> = BTreeMap::new();
    for opp in scored {
        if !known.contains(opp.position_id.as_str()) {
            tracing::debug!(position_id = %opp.position_id, "Dropping opportunity for unknown position");
            continue;
        }
        by_position.entry(opp.position_id.clone()).or_default().push(opp);
    }

    for bucket in by_position.values_mut() {
        bucket.sort_by(compare_ranked);
        let mut seen = HashSet::new();
        bucket.retain(|o| seen.insert(o.target_pool.pool_id.clone()));
    }

    let mut summaries = Vec::with_capacity(positions.len());
    let mut potential_gain = Decimal::ZERO;
    let mut current_yield = Decimal::ZERO;

    for position in positions {
        let best = by_position.get(&position.id).and_then(|b| b.first());
        let best_score = best.map(|o| o.score);
        let status = PositionStatus::from_best_score(best_score);
        let annual_yield = annual_yield_usd(position);

        if let Some(top) = best {
            potential_gain += top.annual_gain_usd;
        }
        current_yield += annual_yield;

        summaries.push(PositionSummary {
            position: Position {
                status,
                ..position.clone()
            },
            best_score,
            status,
            health: position_health(annual_yield, best.map(|o| o.annual_gain_usd)),
        });
    }

    let underperforming_count = summaries
        .iter()
        .filter(|s| s.status != PositionStatus::Optimal)
        .count();
    let portfolio_health = average_health(&summaries);

    RankedOpportunities {
        by_position,
        positions: summaries,
        portfolio_potential_gain_usd: potential_gain,
        current_annual_yield_usd: current_yield,
        potential_annual_yield_usd: current_yield + potential_gain,
        underperforming_count,
        portfolio_health,
    }
}

/// Score descending, then annual gain descending, then pool id for determinism.
fn compare_ranked(a: &ScoredOpportunity, b: &ScoredOpportunity) -> std::cmp::Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.annual_gain_usd.cmp(&a.annual_gain_usd))
        .then_with(|| a.target_pool.pool_id.cmp(&b.target_pool.pool_id))
}

pub fn annual_yield_usd(position: &Position) -> Decimal {
    position.valuation_usd * position.current_apy / Decimal::ONE_HUNDRED
}

/// 100 when nothing meaningful is missed, lower as the best gain grows against current yield.
pub fn position_health(current_yield_usd: Decimal, best_gain_usd: Option<Decimal>) -> u8 {
    let Some(gain) = best_gain_usd else {
        return 100;
    };
    if current_yield_usd <= Decimal::ZERO {
        return 50;
    }

    let loss_pct = gain / current_yield_usd * Decimal::ONE_HUNDRED;
    if loss_pct > Decimal::from(40) {
        20
    } else if loss_pct > Decimal::from(20) {
        50
    } else if loss_pct > Decimal::TEN {
        75
    } else {
        100
    }
}

fn average_health(summaries: &[PositionSummary]) -> u8 {
    if summaries.is_empty() {
        return 100;
    }
    let sum: u32 = summaries.iter().map(|s| u32::from(s.health)).sum();
    let avg = Decimal::from(sum) / Decimal::from(summaries.len() as u64);
    avg.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Breakeven, ChainId, MigrationCosts, ScoreSource, YieldPool};

    fn position(id: &str, valuation: i64, apy: i64) -> Position {
        Position {
            id: id.into(),
            chain_id: ChainId::Ethereum,
            asset_symbol: "USDC".into(),
            amount: Decimal::from(valuation),
            valuation_usd: Decimal::from(valuation),
            current_apy: Decimal::from(apy),
            status: PositionStatus::Optimal,
            days_deployed: 0,
            total_earned_usd: Decimal::ZERO,
        }
    }

    fn opp(position_id: &str, pool_id: &str, score: u8, gain: i64) -> ScoredOpportunity {
        ScoredOpportunity {
            position_id: position_id.into(),
            target_pool: YieldPool {
                protocol_name: "aave-v3".into(),
                chain_id: ChainId::Base,
                asset_symbol: "USDC".into(),
                apy: Decimal::from(12),
                tvl_usd: Decimal::from(1_000_000),
                pool_id: pool_id.into(),
            },
            apy_differential: Decimal::from(4),
            score,
            costs: MigrationCosts {
                bridge: Decimal::from(3),
                gas: Decimal::ONE,
                total: Decimal::from(4),
            },
            breakeven: Breakeven::Days(Decimal::from(30)),
            annual_gain_usd: Decimal::from(gain),
            protocol_safety_score: Decimal::from(9),
            source: ScoreSource::Local,
        }
    }

    #[test]
    fn test_buckets_sorted_and_gain_counted_once_per_position() {
        let positions = vec![position("ethereum:USDC", 1000, 8), position("arbitrum:USDT", 500, 7)];
        let scored = vec![
            opp("ethereum:USDC", "p1", 72, 30),
            opp("ethereum:USDC", "p2", 91, 40),
            opp("ethereum:USDC", "p3", 60, 100),
            opp("arbitrum:USDT", "p4", 80, 10),
        ];
        let ranked = rank(scored, &positions);

        let scores: Vec<u8> = ranked.by_position["ethereum:USDC"].iter().map(|o| o.score).collect();
        assert_eq!(scores, vec![91, 72, 60]);
        // 40 (top of ethereum:USDC) + 10, never the 100 from a lower-ranked candidate
        assert_eq!(ranked.portfolio_potential_gain_usd, Decimal::from(50));
        assert_eq!(ranked.total_opportunities(), 4);
    }

    #[test]
    fn test_status_and_underperforming_count() {
        let positions = vec![
            position("a", 1000, 8),
            position("b", 1000, 8),
            position("c", 1000, 8),
        ];
        let scored = vec![opp("a", "p1", 85, 1), opp("b", "p2", 70, 1), opp("c", "p3", 69, 1)];
        let ranked = rank(scored, &positions);

        let statuses: Vec<PositionStatus> = ranked.positions.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![PositionStatus::Critical, PositionStatus::Underperforming, PositionStatus::Optimal]
        );
        assert_eq!(ranked.positions[0].position.status, PositionStatus::Critical);
        assert_eq!(ranked.underperforming_count, 2);
    }

    #[test]
    fn test_drops_unknown_positions_and_duplicate_pools() {
        let positions = vec![position("a", 1000, 8)];
        let scored = vec![opp("ghost", "p1", 99, 5), opp("a", "p2", 80, 5), opp("a", "p2", 75, 5)];
        let ranked = rank(scored, &positions);

        assert!(!ranked.by_position.contains_key("ghost"));
        assert_eq!(ranked.by_position["a"].len(), 1);
        assert_eq!(ranked.by_position["a"][0].score, 80);
    }

    #[test]
    fn test_yield_summary() {
        // 1000 × 8% = 80 current, best gain 40 → loss 50% → health 20
        let positions = vec![position("a", 1000, 8), position("b", 200, 5)];
        let ranked = rank(vec![opp("a", "p1", 90, 40)], &positions);

        assert_eq!(ranked.current_annual_yield_usd, Decimal::from(90));
        assert_eq!(ranked.potential_annual_yield_usd, Decimal::from(130));
        assert_eq!(ranked.positions[0].health, 20);
        assert_eq!(ranked.positions[1].health, 100);
        assert_eq!(ranked.portfolio_health, 60);
    }

    #[test]
    fn test_position_health_bands() {
        let current = Decimal::from(100);
        assert_eq!(position_health(current, None), 100);
        assert_eq!(position_health(Decimal::ZERO, Some(Decimal::from(5))), 50);
        assert_eq!(position_health(current, Some(Decimal::from(41))), 20);
        assert_eq!(position_health(current, Some(Decimal::from(21))), 50);
        assert_eq!(position_health(current, Some(Decimal::from(11))), 75);
        assert_eq!(position_health(current, Some(Decimal::from(10))), 100);
    }

    #[test]
    fn test_empty_input() {
        let ranked = rank(Vec::new(), &[]);
        assert_eq!(ranked.total_opportunities(), 0);
        assert_eq!(ranked.portfolio_potential_gain_usd, Decimal::ZERO);
        assert_eq!(ranked.portfolio_health, 100);
    }
}
