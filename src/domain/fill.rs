// ============================================================================
// Fill Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::OrderId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One matched quantity between a resting maker and an incoming taker.
///
/// Created exactly once per matched unit of work during a match pass and
/// never mutated afterwards. The price is always the maker's price.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fill {
    /// Unique fill identifier
    pub id: Uuid,

    /// Order ID of the incoming (aggressive) order
    pub taker_order_id: OrderId,

    /// Order ID of the resting (passive) order
    pub maker_order_id: OrderId,

    /// Execution price, taken from the maker
    pub price: Decimal,

    /// Executed quantity in shares
    pub quantity: u64,

    /// Fill timestamp
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    pub fn new(
        taker_order_id: OrderId,
        maker_order_id: OrderId,
        price: Decimal,
        quantity: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            taker_order_id,
            maker_order_id,
            price,
            quantity,
            timestamp,
        }
    }

    /// Notional value of the fill (price * quantity).
    ///
    /// Returns `None` when the multiplication overflows.
    pub fn notional_value(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}
