// ============================================================================
// Matching Engine
// Core business logic for order submission, cancellation and snapshots
// ============================================================================

use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::{
    Fill, Order, OrderBook, OrderBookConfig, OrderBookSnapshot, OrderId, OrderType, Side,
};
use crate::engine::PriceTimePriority;
use crate::errors::EngineError;
use crate::interfaces::{Clock, EventHandler, OrderEvent};

// ============================================================================
// Submission Types
// ============================================================================

/// A validated-order-to-be: what the caller supplies to `submit_order`.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: u64,
    pub price: Option<Decimal>,
}

impl OrderRequest {
    pub fn limit(side: Side, quantity: u64, price: Decimal) -> Self {
        Self {
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
        }
    }

    pub fn market(side: Side, quantity: u64) -> Self {
        Self {
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
        }
    }
}

/// Final disposition of an incoming order after its match pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Fully filled
    Filled,
    /// Partially filled, remainder resting in the book (limit)
    PartiallyFilledResting,
    /// Partially filled, remainder discarded (market)
    PartiallyFilledDiscarded,
    /// Zero fills, fully resting (limit)
    Resting,
    /// Zero fills, fully discarded (market against no liquidity)
    Discarded,
}

/// Outcome of one submission: the ordered fills plus the final order state.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub order_id: OrderId,
    pub fills: Vec<Fill>,
    pub status: OrderStatus,
    pub filled_quantity: u64,
    /// For market orders this is the unfilled quantity reported back to the
    /// caller; it is never queued.
    pub remaining_quantity: u64,
}

// ============================================================================
// Matching Engine
// ============================================================================

/// Serialized matching engine for a single instrument.
///
/// The order book is one shared mutable resource; a mutex is held for the
/// whole validate-match-disposition pass so no other submission can observe a
/// half-decremented maker. Separate instruments use separate engines and
/// share no state. Events are delivered after the lock is released.
pub struct MatchingEngine {
    config: OrderBookConfig,
    book: Mutex<OrderBook>,
    algorithm: PriceTimePriority,
    event_handler: Arc<dyn EventHandler>,
    clock: Arc<dyn Clock>,
    order_sequence: AtomicU64,
}

impl MatchingEngine {
    pub fn new(
        config: OrderBookConfig,
        event_handler: Arc<dyn EventHandler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let book = OrderBook::new(config.symbol.clone());
        Self {
            config,
            book: Mutex::new(book),
            algorithm: PriceTimePriority::new(),
            event_handler,
            clock,
            order_sequence: AtomicU64::new(1),
        }
    }

    /// Start building an engine for `symbol` with default collaborators.
    pub fn builder(symbol: impl Into<String>) -> super::MatchingEngineBuilder {
        super::MatchingEngineBuilder::new(symbol)
    }

    /// Submit an order: validate, match against the opposing side, then rest
    /// or discard the remainder.
    ///
    /// Validation failures reject the whole order before any book mutation.
    /// The match pass itself cannot partially fail.
    pub fn submit_order(&self, request: OrderRequest) -> Result<MatchResult, EngineError> {
        self.validate(&request)?;

        let order_id = OrderId::new(self.order_sequence.fetch_add(1, Ordering::AcqRel));
        let mut order = Order::new(
            order_id,
            request.side,
            request.order_type,
            request.price,
            request.quantity,
            self.clock.now(),
        );

        let mut events = vec![OrderEvent::OrderAccepted {
            order_id,
            timestamp: order.timestamp,
        }];

        let (fills, status, top_of_book) = {
            let mut book = self.book.lock();

            let fills = self
                .algorithm
                .match_order(&mut order, &mut book, self.clock.as_ref());

            let status = self.dispose(order, &mut book)?;
            (fills, status, (book.best_bid(), book.best_ask()))
        };

        let filled_quantity: u64 = fills.iter().map(|fill| fill.quantity).sum();
        let remaining_quantity = request.quantity - filled_quantity;

        for fill in &fills {
            events.push(OrderEvent::OrderFilled { fill: fill.clone() });
        }
        self.push_disposition_events(
            &mut events,
            order_id,
            status,
            request.price,
            filled_quantity,
            remaining_quantity,
        );
        events.push(OrderEvent::BookUpdated {
            best_bid: top_of_book.0,
            best_ask: top_of_book.1,
            timestamp: self.clock.now(),
        });
        self.event_handler.on_events(events);

        tracing::debug!(
            order_id = order_id.value(),
            fills = fills.len(),
            ?status,
            "match pass complete"
        );

        Ok(MatchResult {
            order_id,
            fills,
            status,
            filled_quantity,
            remaining_quantity,
        })
    }

    /// Cancel a resting order under the same serialization discipline as a
    /// match pass. Idempotent no-op on the book when the id is unknown.
    pub fn cancel_order(&self, order_id: OrderId) -> Result<(), EngineError> {
        let top_of_book = {
            let mut book = self.book.lock();
            let mut order = book.remove_resting(order_id)?;
            order.cancel();
            (book.best_bid(), book.best_ask())
        };

        self.event_handler.on_events(vec![
            OrderEvent::OrderCancelled {
                order_id,
                timestamp: self.clock.now(),
            },
            OrderEvent::BookUpdated {
                best_bid: top_of_book.0,
                best_ask: top_of_book.1,
                timestamp: self.clock.now(),
            },
        ]);

        Ok(())
    }

    /// Consistent point-in-time view of the top `depth` levels per side.
    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        self.book.lock().snapshot(depth)
    }

    pub fn spread(&self) -> Option<Decimal> {
        let book = self.book.lock();
        match (book.best_bid(), book.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        let book = self.book.lock();
        match (book.best_bid(), book.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    /// Rest a limit remainder; report a market remainder as unfilled.
    fn dispose(&self, order: Order, book: &mut OrderBook) -> Result<OrderStatus, EngineError> {
        let remaining = order.remaining_quantity();
        let filled = order.filled_quantity();

        if remaining == 0 {
            return Ok(OrderStatus::Filled);
        }

        match order.order_type {
            OrderType::Limit => {
                book.insert(order)?;
                Ok(if filled > 0 {
                    OrderStatus::PartiallyFilledResting
                } else {
                    OrderStatus::Resting
                })
            },
            OrderType::Market => Ok(if filled > 0 {
                OrderStatus::PartiallyFilledDiscarded
            } else {
                OrderStatus::Discarded
            }),
        }
    }

    fn push_disposition_events(
        &self,
        events: &mut Vec<OrderEvent>,
        order_id: OrderId,
        status: OrderStatus,
        price: Option<Decimal>,
        filled_quantity: u64,
        remaining_quantity: u64,
    ) {
        let timestamp = self.clock.now();
        match status {
            OrderStatus::Filled => events.push(OrderEvent::OrderFullyFilled {
                order_id,
                total_filled: filled_quantity,
                timestamp,
            }),
            OrderStatus::PartiallyFilledResting | OrderStatus::PartiallyFilledDiscarded => {
                events.push(OrderEvent::OrderPartiallyFilled {
                    order_id,
                    filled_quantity,
                    remaining_quantity,
                    timestamp,
                });
            },
            OrderStatus::Resting | OrderStatus::Discarded => {},
        }
        match status {
            OrderStatus::Resting | OrderStatus::PartiallyFilledResting => {
                if let Some(price) = price {
                    events.push(OrderEvent::OrderAddedToBook {
                        order_id,
                        price,
                        quantity: remaining_quantity,
                        timestamp,
                    });
                }
            },
            OrderStatus::PartiallyFilledDiscarded | OrderStatus::Discarded => {
                events.push(OrderEvent::OrderDiscarded {
                    order_id,
                    unfilled_quantity: remaining_quantity,
                    timestamp,
                });
            },
            OrderStatus::Filled => {},
        }
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), EngineError> {
        if request.quantity == 0 {
            return Err(EngineError::InvalidOrder(
                "quantity must be positive".to_string(),
            ));
        }

        if let Some(lot) = self.config.lot_size {
            if request.quantity % lot != 0 {
                return Err(EngineError::InvalidOrder(format!(
                    "quantity {} is not a multiple of lot size {}",
                    request.quantity, lot
                )));
            }
        }

        match request.order_type {
            OrderType::Limit => {
                let price = request.price.ok_or_else(|| {
                    EngineError::InvalidOrder("limit orders must have a price".to_string())
                })?;
                if price <= Decimal::ZERO {
                    return Err(EngineError::InvalidOrder(
                        "price must be positive".to_string(),
                    ));
                }
                if let Some(tick) = self.config.tick_size {
                    if price % tick != Decimal::ZERO {
                        return Err(EngineError::InvalidOrder(format!(
                            "price {} is not a multiple of tick size {}",
                            price, tick
                        )));
                    }
                }
            },
            OrderType::Market => {
                if request.price.is_some() {
                    return Err(EngineError::InvalidOrder(
                        "market orders must not carry a price".to_string(),
                    ));
                }
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{NoOpEventHandler, RecordingEventHandler, SystemClock};

    fn engine() -> MatchingEngine {
        MatchingEngine::new(
            OrderBookConfig::new("ACME"),
            Arc::new(NoOpEventHandler),
            Arc::new(SystemClock),
        )
    }

    #[test]
    fn test_limit_rests_then_crossing_limit_fills() {
        let engine = engine();

        let sell = engine
            .submit_order(OrderRequest::limit(Side::Sell, 100, Decimal::from(20)))
            .unwrap();
        assert_eq!(sell.status, OrderStatus::Resting);
        assert!(sell.fills.is_empty());

        let buy = engine
            .submit_order(OrderRequest::limit(Side::Buy, 100, Decimal::from(25)))
            .unwrap();
        assert_eq!(buy.status, OrderStatus::Filled);
        assert_eq!(buy.fills.len(), 1);
        // Maker's price wins
        assert_eq!(buy.fills[0].price, Decimal::from(20));
        assert_eq!(buy.fills[0].maker_order_id, sell.order_id);

        let snapshot = engine.snapshot(10);
        assert!(snapshot.bids.is_empty());
        assert!(snapshot.asks.is_empty());
    }

    #[test]
    fn test_validation_rejects_without_book_mutation() {
        let engine = engine();

        assert!(matches!(
            engine.submit_order(OrderRequest::market(Side::Buy, 0)),
            Err(EngineError::InvalidOrder(_))
        ));
        assert!(matches!(
            engine.submit_order(OrderRequest {
                side: Side::Buy,
                order_type: OrderType::Limit,
                quantity: 10,
                price: None,
            }),
            Err(EngineError::InvalidOrder(_))
        ));
        assert!(matches!(
            engine.submit_order(OrderRequest::limit(Side::Buy, 10, Decimal::from(-5))),
            Err(EngineError::InvalidOrder(_))
        ));
        assert!(matches!(
            engine.submit_order(OrderRequest {
                side: Side::Buy,
                order_type: OrderType::Market,
                quantity: 10,
                price: Some(Decimal::from(10)),
            }),
            Err(EngineError::InvalidOrder(_))
        ));

        let snapshot = engine.snapshot(10);
        assert!(snapshot.bids.is_empty());
        assert!(snapshot.asks.is_empty());
    }

    #[test]
    fn test_tick_and_lot_enforcement() {
        let engine = MatchingEngine::new(
            OrderBookConfig::new("ACME")
                .with_tick_size(Decimal::new(5, 1)) // 0.5
                .with_lot_size(100),
            Arc::new(NoOpEventHandler),
            Arc::new(SystemClock),
        );

        assert!(matches!(
            engine.submit_order(OrderRequest::limit(Side::Buy, 100, Decimal::new(103, 1))),
            Err(EngineError::InvalidOrder(_))
        ));
        assert!(matches!(
            engine.submit_order(OrderRequest::limit(Side::Buy, 150, Decimal::from(10))),
            Err(EngineError::InvalidOrder(_))
        ));
        assert!(engine
            .submit_order(OrderRequest::limit(Side::Buy, 200, Decimal::new(105, 1)))
            .is_ok());
    }

    #[test]
    fn test_cancel_order() {
        let engine = engine();

        let resting = engine
            .submit_order(OrderRequest::limit(Side::Buy, 100, Decimal::from(50)))
            .unwrap();

        engine.cancel_order(resting.order_id).unwrap();
        assert!(engine.snapshot(10).bids.is_empty());

        // Second cancel is NotFound; the book is untouched
        assert_eq!(
            engine.cancel_order(resting.order_id),
            Err(EngineError::NotFound(resting.order_id))
        );
    }

    #[test]
    fn test_cancel_preserves_time_priority_of_others() {
        let engine = engine();

        let first = engine
            .submit_order(OrderRequest::limit(Side::Sell, 100, Decimal::from(50)))
            .unwrap();
        let second = engine
            .submit_order(OrderRequest::limit(Side::Sell, 100, Decimal::from(50)))
            .unwrap();
        let third = engine
            .submit_order(OrderRequest::limit(Side::Sell, 100, Decimal::from(50)))
            .unwrap();

        engine.cancel_order(second.order_id).unwrap();

        let taker = engine
            .submit_order(OrderRequest::market(Side::Buy, 200))
            .unwrap();
        assert_eq!(taker.fills.len(), 2);
        assert_eq!(taker.fills[0].maker_order_id, first.order_id);
        assert_eq!(taker.fills[1].maker_order_id, third.order_id);
    }

    #[test]
    fn test_fully_filled_maker_cannot_be_cancelled() {
        let engine = engine();

        let maker = engine
            .submit_order(OrderRequest::limit(Side::Sell, 100, Decimal::from(50)))
            .unwrap();
        engine
            .submit_order(OrderRequest::market(Side::Buy, 100))
            .unwrap();

        assert_eq!(
            engine.cancel_order(maker.order_id),
            Err(EngineError::NotFound(maker.order_id))
        );
    }

    #[test]
    fn test_event_stream_for_partial_fill() {
        let handler = Arc::new(RecordingEventHandler::new());
        let engine = MatchingEngine::new(
            OrderBookConfig::new("ACME"),
            handler.clone(),
            Arc::new(SystemClock),
        );

        engine
            .submit_order(OrderRequest::limit(Side::Sell, 700, Decimal::from(100)))
            .unwrap();
        handler.take();

        engine
            .submit_order(OrderRequest::market(Side::Buy, 600))
            .unwrap();
        let events = handler.take();

        assert!(matches!(events[0], OrderEvent::OrderAccepted { .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, OrderEvent::OrderFilled { fill } if fill.quantity == 600)));
        assert!(events
            .iter()
            .any(|e| matches!(e, OrderEvent::OrderFullyFilled { total_filled: 600, .. })));
        assert!(matches!(
            events.last(),
            Some(OrderEvent::BookUpdated {
                best_ask: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn test_order_ids_are_monotonic() {
        let engine = engine();
        let a = engine
            .submit_order(OrderRequest::limit(Side::Buy, 10, Decimal::from(10)))
            .unwrap();
        let b = engine
            .submit_order(OrderRequest::limit(Side::Buy, 10, Decimal::from(9)))
            .unwrap();
        assert!(b.order_id > a.order_id);
    }
}
