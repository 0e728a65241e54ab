use crate::models::{Position, YieldPool};

/// Most candidates kept per position.
pub const MAX_CANDIDATES: usize = 10;

/// Cross-chain pools for the same asset paying strictly more than the position.
///
/// Sorted by APY descending, ties broken by higher TVL. An empty result means the
/// position is already optimal.
pub fn match_candidates(position: &Position, pools: &[YieldPool]) -> Vec<YieldPool> {
    let mut candidates: Vec<YieldPool> = pools
        .iter()
        .filter(|pool| is_candidate(position, pool))
        .cloned()
        .collect();

    candidates.sort_by(|a, b| b.apy.cmp(&a.apy).then_with(|| b.tvl_usd.cmp(&a.tvl_usd)));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

pub fn is_candidate(position: &Position, pool: &YieldPool) -> bool {
    same_asset(&pool.asset_symbol, &position.asset_symbol)
        && pool.chain_id != position.chain_id
        && pool.apy > position.current_apy
}

/// Case-insensitive symbol match where wrapped ether stands in for ETH.
pub fn same_asset(a: &str, b: &str) -> bool {
    canonical_symbol(a).eq_ignore_ascii_case(canonical_symbol(b))
}

fn canonical_symbol(symbol: &str) -> &str {
    let symbol = symbol.trim();
    if symbol.eq_ignore_ascii_case("WETH") {
        "ETH"
    } else {
        symbol
    }
}
