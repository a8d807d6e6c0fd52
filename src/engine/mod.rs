// ============================================================================
// Engine Module
// Contains the core matching engine business logic
// ============================================================================

mod factory;
mod matching_engine;
mod price_time;

pub use factory::MatchingEngineBuilder;
pub use matching_engine::{MatchResult, MatchingEngine, OrderRequest, OrderStatus};
pub use price_time::PriceTimePriority;
