// ============================================================================
// Order Book Configuration
// ============================================================================

use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-instrument configuration for an order book.
///
/// Tick and lot sizes are optional; when set they are enforced during order
/// validation before any book mutation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookConfig {
    /// The trading instrument (e.g., "AAPL", "BTC-USD")
    pub symbol: String,

    /// Minimum price increment. `None` means no tick enforcement.
    pub tick_size: Option<Decimal>,

    /// Minimum quantity increment in shares. `None` means no lot enforcement.
    pub lot_size: Option<u64>,
}

impl OrderBookConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            tick_size: None,
            lot_size: None,
        }
    }

    /// Builder method: set the price tick size
    pub fn with_tick_size(mut self, tick: Decimal) -> Self {
        self.tick_size = Some(tick);
        self
    }

    /// Builder method: set the lot size
    pub fn with_lot_size(mut self, lot: u64) -> Self {
        self.lot_size = Some(lot);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.is_empty() {
            return Err("symbol cannot be empty".to_string());
        }

        if let Some(tick) = self.tick_size {
            if tick <= Decimal::ZERO {
                return Err("tick size must be positive".to_string());
            }
        }

        if self.lot_size == Some(0) {
            return Err("lot size must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = OrderBookConfig::new("AAPL");
        assert_eq!(config.symbol, "AAPL");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = OrderBookConfig::new("AAPL")
            .with_tick_size(Decimal::new(1, 2))
            .with_lot_size(100);

        assert_eq!(config.tick_size, Some(Decimal::new(1, 2)));
        assert_eq!(config.lot_size, Some(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(OrderBookConfig::new("").validate().is_err());
        assert!(OrderBookConfig::new("AAPL")
            .with_tick_size(Decimal::ZERO)
            .validate()
            .is_err());
        assert!(OrderBookConfig::new("AAPL")
            .with_lot_size(0)
            .validate()
            .is_err());
    }
}
