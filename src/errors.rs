// ============================================================================
// Engine Errors
// ============================================================================

use thiserror::Error;

use crate::domain::OrderId;

/// Externally caused failures surfaced synchronously to the submitter.
///
/// None of these are retried internally; a rejected order is simply not
/// accepted and the book is left untouched. Internal invariant violations are
/// programming errors and are handled with debug assertions instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Non-positive quantity, missing or non-positive price on a limit
    /// order, a market order carrying a price, or a tick/lot violation.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Cancellation referencing an id that is not currently resting.
    #[error("order {0} not found in book")]
    NotFound(OrderId),

    /// Rejected order book configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
