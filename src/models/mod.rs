pub mod balance;
pub mod chain;
pub mod opportunity;
pub mod pool;
pub mod portfolio;
pub mod position;
pub mod protocol;
pub mod transaction;

pub use balance::{usd_value, BalanceRecord};
pub use chain::{ChainId, TokenContract};
pub use opportunity::{
    Breakeven, CostParams, MigrationCosts, PositionSummary, RankedOpportunities, ScoreSource,
    ScoredOpportunity,
};
pub use pool::YieldPool;
pub use portfolio::{ActivityLevel, ChainBalance, PortfolioSnapshot};
pub use position::{Position, PositionStatus};
pub use protocol::{lookup_protocol, safety_score_for, ProtocolInfo, KNOWN_PROTOCOLS};
pub use transaction::{TransactionRecord, TxKind};
