// ============================================================================
// Matching Engine Builder
// Wires configuration, event sink and clock into an engine
// ============================================================================

use std::sync::Arc;

use crate::domain::OrderBookConfig;
use crate::engine::MatchingEngine;
use crate::errors::EngineError;
use crate::interfaces::{Clock, EventHandler, NoOpEventHandler, SystemClock};

/// Builder for [`MatchingEngine`].
///
/// Defaults: no tick/lot constraints, [`NoOpEventHandler`], [`SystemClock`].
///
/// # Example
/// ```
/// use matchbook::prelude::*;
/// use rust_decimal::Decimal;
/// use std::sync::Arc;
///
/// let engine = MatchingEngine::builder("AAPL")
///     .tick_size(Decimal::new(1, 2))
///     .event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert_eq!(engine.symbol(), "AAPL");
/// ```
pub struct MatchingEngineBuilder {
    config: OrderBookConfig,
    event_handler: Arc<dyn EventHandler>,
    clock: Arc<dyn Clock>,
}

impl MatchingEngineBuilder {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            config: OrderBookConfig::new(symbol),
            event_handler: Arc::new(NoOpEventHandler),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: OrderBookConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tick_size(mut self, tick: rust_decimal::Decimal) -> Self {
        self.config.tick_size = Some(tick);
        self
    }

    pub fn lot_size(mut self, lot: u64) -> Self {
        self.config.lot_size = Some(lot);
        self
    }

    pub fn event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<MatchingEngine, EngineError> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;
        Ok(MatchingEngine::new(
            self.config,
            self.event_handler,
            self.clock,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_builder_defaults() {
        let engine = MatchingEngineBuilder::new("ACME").build().unwrap();
        assert_eq!(engine.symbol(), "ACME");
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        assert!(matches!(
            MatchingEngineBuilder::new("").build(),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            MatchingEngineBuilder::new("ACME")
                .tick_size(Decimal::ZERO)
                .build(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_builder_with_full_config() {
        let config = OrderBookConfig::new("ACME")
            .with_tick_size(Decimal::new(1, 2))
            .with_lot_size(100);
        let engine = MatchingEngineBuilder::new("ignored")
            .config(config)
            .build()
            .unwrap();
        assert_eq!(engine.symbol(), "ACME");
    }
}
