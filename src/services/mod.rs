pub mod pool_cache;
pub mod portfolio_service;
pub mod scoring;

pub use pool_cache::YieldPoolCache;
pub use portfolio_service::{validate_address, PortfolioService, ServiceSettings};
pub use scoring::OpportunityScorer;
