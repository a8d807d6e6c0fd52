// ============================================================================
// Matchbook Library
// In-memory limit order book with price-time priority matching
// ============================================================================

//! # Matchbook
//!
//! A securities order-matching core: an in-memory limit order book plus a
//! price-time priority matching engine.
//!
//! ## Features
//!
//! - **Price-time priority** matching: strict price priority across levels,
//!   strict FIFO within a level
//! - **Limit and Market orders** with partial-fill and remainder semantics;
//!   a market remainder is reported unfilled, never queued
//! - **Serialized match passes**: one submission at a time per instrument,
//!   behind a single book lock
//! - **Event stream** of fills and book updates for external observers
//!
//! ## Example
//!
//! ```rust
//! use matchbook::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let engine = MatchingEngine::builder("ACME").build().unwrap();
//!
//! // A limit sell rests in the book
//! let resting = engine
//!     .submit_order(OrderRequest::limit(Side::Sell, 700, Decimal::from(100)))
//!     .unwrap();
//! assert_eq!(resting.status, OrderStatus::Resting);
//!
//! // A market buy consumes part of it at the maker's price
//! let taker = engine
//!     .submit_order(OrderRequest::market(Side::Buy, 600))
//!     .unwrap();
//! assert_eq!(taker.fills.len(), 1);
//! assert_eq!(taker.fills[0].quantity, 600);
//! assert_eq!(taker.fills[0].price, Decimal::from(100));
//!
//! // The ask level keeps the 100-share remainder
//! let snapshot = engine.snapshot(10);
//! assert_eq!(snapshot.asks, vec![(Decimal::from(100), 100)]);
//! assert!(snapshot.bids.is_empty());
//! ```

pub mod domain;
pub mod engine;
pub mod errors;
pub mod interfaces;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::order::state::OrderState;
    pub use crate::domain::{
        BookSide, Fill, Order, OrderBook, OrderBookConfig, OrderBookSnapshot, OrderId, OrderType,
        PriceLevel, Side,
    };
    pub use crate::engine::{
        MatchResult, MatchingEngine, MatchingEngineBuilder, OrderRequest, OrderStatus,
        PriceTimePriority,
    };
    pub use crate::errors::EngineError;
    pub use crate::interfaces::{
        Clock, EventHandler, LoggingEventHandler, NoOpEventHandler, OrderEvent,
        RecordingEventHandler, SystemClock,
    };
}
