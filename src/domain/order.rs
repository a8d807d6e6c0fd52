// ============================================================================
// Order Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Order identifier, assigned from the engine's monotonic sequence at
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(u64);

impl OrderId {
    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order matches against.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderType {
    Limit,
    Market,
}

// ============================================================================
// Order State Machine
// ============================================================================

pub mod state {
    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum OrderState {
        Accepted,
        PartiallyFilled,
        Filled,
        Cancelled,
    }

    impl OrderState {
        pub fn is_terminal(&self) -> bool {
            matches!(self, OrderState::Filled | OrderState::Cancelled)
        }

        pub fn can_be_cancelled(&self) -> bool {
            matches!(self, OrderState::Accepted | OrderState::PartiallyFilled)
        }
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// A single resting or incoming instruction.
///
/// Identity is immutable; `remaining_quantity` is the only matching-time
/// mutable state and decreases monotonically as fills occur. A partially
/// filled order is mutated in place and keeps its queue position, it is never
/// removed and reinserted.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    /// Present for Limit orders, `None` for Market orders.
    pub price: Option<Decimal>,
    /// Original quantity at submission.
    pub quantity: u64,
    /// Arrival time in the book.
    pub timestamp: DateTime<Utc>,

    remaining_quantity: u64,
    state: state::OrderState,
}

impl Order {
    pub fn new(
        id: OrderId,
        side: Side,
        order_type: OrderType,
        price: Option<Decimal>,
        quantity: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            side,
            order_type,
            price,
            quantity,
            timestamp,
            remaining_quantity: quantity,
            state: state::OrderState::Accepted,
        }
    }

    pub fn remaining_quantity(&self) -> u64 {
        self.remaining_quantity
    }

    pub fn filled_quantity(&self) -> u64 {
        self.quantity - self.remaining_quantity
    }

    pub fn state(&self) -> state::OrderState {
        self.state
    }

    pub fn is_market_order(&self) -> bool {
        matches!(self.order_type, OrderType::Market)
    }

    pub fn is_limit_order(&self) -> bool {
        matches!(self.order_type, OrderType::Limit)
    }

    /// Consume `quantity` of the remainder. The caller guarantees
    /// `quantity <= remaining_quantity`; the match loop never over-allocates.
    pub(crate) fn fill(&mut self, quantity: u64) {
        debug_assert!(
            quantity > 0 && quantity <= self.remaining_quantity,
            "fill of {} against remaining {}",
            quantity,
            self.remaining_quantity
        );
        self.remaining_quantity = self.remaining_quantity.saturating_sub(quantity);
        self.state = if self.remaining_quantity == 0 {
            state::OrderState::Filled
        } else {
            state::OrderState::PartiallyFilled
        };
    }

    pub(crate) fn cancel(&mut self) {
        debug_assert!(self.state.can_be_cancelled());
        self.state = state::OrderState::Cancelled;
    }
}
