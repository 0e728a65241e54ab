pub mod aggregator;
pub mod chain_fetch;
pub mod positions;

pub use aggregator::{aggregate, aggregate_at};
pub use chain_fetch::{fetch_all_chains, fold_results, FetchedPortfolio};
pub use positions::{default_apy, materialize_positions};
