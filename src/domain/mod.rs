// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod fill;
pub mod order;
pub mod order_book;

pub use config::OrderBookConfig;
pub use fill::Fill;
pub use order::{Order, OrderId, OrderType, Side};
pub use order_book::{BookSide, OrderBook, OrderBookSnapshot, PriceLevel};

// Re-export state machine
pub use order::state::OrderState;
