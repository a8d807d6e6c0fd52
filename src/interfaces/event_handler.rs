// ============================================================================
// Event Handler Interface
// Defines the contract for the fill / book-update event sink
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Fill, OrderId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the matching engine.
///
/// Delivered after the match pass has released the book lock; consumers are
/// fire-and-forget observers and are not part of the matching contract.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderEvent {
    /// Order validated and accepted for matching
    OrderAccepted {
        order_id: OrderId,
        timestamp: DateTime<Utc>,
    },

    /// One matched quantity between taker and maker
    OrderFilled { fill: Fill },

    /// Incoming order fully filled during its match pass
    OrderFullyFilled {
        order_id: OrderId,
        total_filled: u64,
        timestamp: DateTime<Utc>,
    },

    /// Incoming order partially filled
    OrderPartiallyFilled {
        order_id: OrderId,
        filled_quantity: u64,
        remaining_quantity: u64,
        timestamp: DateTime<Utc>,
    },

    /// Limit remainder now resting in the book
    OrderAddedToBook {
        order_id: OrderId,
        price: Decimal,
        quantity: u64,
        timestamp: DateTime<Utc>,
    },

    /// Market remainder discarded, never queued
    OrderDiscarded {
        order_id: OrderId,
        unfilled_quantity: u64,
        timestamp: DateTime<Utc>,
    },

    /// Resting order cancelled and removed from its level
    OrderCancelled {
        order_id: OrderId,
        timestamp: DateTime<Utc>,
    },

    /// Top of book after a completed match pass or cancellation
    BookUpdated {
        best_bid: Option<Decimal>,
        best_ask: Option<Decimal>,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for consuming matching engine events.
/// Implementations can handle logging, market data publication, audit, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an order event
    fn on_event(&self, event: OrderEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<OrderEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: OrderEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        tracing::debug!("matching engine event: {:?}", event);
    }
}

/// Buffers every event it receives; useful for tests and audit capture.
#[derive(Default)]
pub struct RecordingEventHandler {
    events: parking_lot::Mutex<Vec<OrderEvent>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything recorded so far.
    pub fn take(&self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.events.lock())
    }
}

impl EventHandler for RecordingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        self.events.lock().push(event);
    }
}
