use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ChainId;

const STABLECOINS: [&str; 3] = ["USDC", "USDT", "DAI"];
const ETH_LIKE: [&str; 2] = ["ETH", "WETH"];

/// Provider-agnostic holding of one asset on one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub chain_id: ChainId,
    pub asset_symbol: String,
    pub amount: Decimal,
    pub valuation_usd: Decimal,
}

impl BalanceRecord {
    /// Build a record valued at the fixed USD/ETH rate.
    pub fn valued(chain_id: ChainId, asset_symbol: &str, amount: Decimal, eth_price_usd: Decimal) -> Self {
        Self {
            chain_id,
            asset_symbol: asset_symbol.to_uppercase(),
            amount,
            valuation_usd: usd_value(asset_symbol, amount, eth_price_usd),
        }
    }

    pub fn is_native(&self) -> bool {
        self.asset_symbol.eq_ignore_ascii_case(self.chain_id.native_symbol())
    }

    pub fn is_zero(&self) -> bool {
        self.amount <= Decimal::ZERO
    }
}

/// USD value of `amount` units of `symbol`. Stablecoins are pegged 1:1, ETH and
/// WETH use the supplied rate, anything else is unpriced.
pub fn usd_value(symbol: &str, amount: Decimal, eth_price_usd: Decimal) -> Decimal {
    let symbol = symbol.to_uppercase();
    if STABLECOINS.contains(&symbol.as_str()) {
        amount
    } else if ETH_LIKE.contains(&symbol.as_str()) {
        amount * eth_price_usd
    } else {
        Decimal::ZERO
    }
}
