pub mod advice;
pub mod health;
pub mod matcher;
pub mod migration;
pub mod ranker;

pub use advice::{advise, advise_all, score_label, OpportunityAdvice, TimingAdvice, Urgency};
pub use health::{score_health, HealthBreakdown, HealthScore};
pub use matcher::match_candidates;
pub use migration::score_opportunity;
pub use ranker::rank;
