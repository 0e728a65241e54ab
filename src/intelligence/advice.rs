use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::protocol::display_name_for;
use crate::models::{Position, RankedOpportunities, ScoredOpportunity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingAdvice {
    pub recommendation: String,
    pub reason: String,
    pub urgency: Urgency,
}

/// Human-facing guidance attached to one scored opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityAdvice {
    pub position_id: String,
    pub pool_id: String,
    pub label: String,
    pub timing: TimingAdvice,
    pub steps: Vec<String>,
}

pub fn score_label(score: u8) -> &'static str {
    match score {
        85..=u8::MAX => "Excellent Opportunity",
        70..=84 => "Good Opportunity",
        50..=69 => "Moderate Opportunity",
        _ => "Stay Put",
    }
}

pub fn timing_advice(score: u8, apy_differential: Decimal) -> TimingAdvice {
    match score {
        85..=u8::MAX => TimingAdvice {
            recommendation: "Move in next 48 hours".into(),
            reason: format!(
                "APY differential of {:.1}% is exceptional",
                apy_differential.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            ),
            urgency: Urgency::High,
        },
        70..=84 => TimingAdvice {
            recommendation: "Good opportunity, consider this week".into(),
            reason: "Strong yield improvement potential".into(),
            urgency: Urgency::Medium,
        },
        _ => TimingAdvice {
            recommendation: "Monitor for better timing".into(),
            reason: "Moderate opportunity, wait for optimal conditions".into(),
            urgency: Urgency::Low,
        },
    }
}

/// Ordered steps to move `position` into the opportunity's target pool.
pub fn migration_steps(position: &Position, opp: &ScoredOpportunity) -> Vec<String> {
    let asset = &position.asset_symbol;
    let amount = position.amount.round_dp(2).normalize();
    let from = position.chain_id.display_name();
    let to = opp.target_pool.chain_id.display_name();
    let protocol = display_name_for(&opp.target_pool.protocol_name);

    vec![
        format!("Withdraw {amount} {asset} from your current protocol on {from}"),
        format!(
            "Bridge {asset} from {from} to {to} (estimated fee: ${})",
            opp.costs.bridge.round_dp(2)
        ),
        format!("Approve {asset} for {protocol} on {to}"),
        format!("Deposit {amount} {asset} to {protocol} on {to}"),
        format!("Start earning {:.2}% APY", opp.target_pool.apy.round_dp(2)),
    ]
}

pub fn advise(position: &Position, opp: &ScoredOpportunity) -> OpportunityAdvice {
    OpportunityAdvice {
        position_id: opp.position_id.clone(),
        pool_id: opp.target_pool.pool_id.clone(),
        label: score_label(opp.score).to_string(),
        timing: timing_advice(opp.score, opp.apy_differential),
        steps: migration_steps(position, opp),
    }
}

/// Advice for every ranked opportunity, in position order then rank order.
pub fn advise_all(ranked: &RankedOpportunities) -> Vec<OpportunityAdvice> {
    ranked
        .positions
        .iter()
        .flat_map(|summary| {
            ranked
                .by_position
                .get(&summary.position.id)
                .into_iter()
                .flatten()
                .map(move |opp| advise(&summary.position, opp))
        })
        .collect()
}
