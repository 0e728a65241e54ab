use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ChainId;

/// One entry of the external yield catalog. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldPool {
    pub protocol_name: String,
    pub chain_id: ChainId,
    pub asset_symbol: String,
    /// Percent, e.g. 8.0 for 8% APY.
    pub apy: Decimal,
    pub tvl_usd: Decimal,
    pub pool_id: String,
}
