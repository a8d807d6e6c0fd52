// ============================================================================
// Order Book Domain Model
// ============================================================================

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::errors::EngineError;

use super::{Order, OrderId, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Price Level
// ============================================================================

/// FIFO queue of resting orders sharing one price.
///
/// Insertion order is arrival order; the head is always the oldest order with
/// remaining quantity. `total_quantity` tracks the sum of member remainders.
#[derive(Debug)]
pub struct PriceLevel {
    pub price: Decimal,
    orders: VecDeque<Order>,
    total_quantity: u64,
}

impl PriceLevel {
    fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_quantity: 0,
        }
    }

    fn push_back(&mut self, order: Order) {
        self.total_quantity += order.remaining_quantity();
        self.orders.push_back(order);
    }

    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    pub(crate) fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    pub(crate) fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Reduce the aggregate after a fill against a member order.
    pub(crate) fn reduce(&mut self, quantity: u64) {
        debug_assert!(quantity <= self.total_quantity);
        self.total_quantity = self.total_quantity.saturating_sub(quantity);
    }

    fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|order| order.id == order_id)?;
        let order = self.orders.remove(position)?;
        self.reduce(order.remaining_quantity());
        Some(order)
    }

    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

// ============================================================================
// Book Side
// ============================================================================

/// One side of the book: price levels in a sorted map.
///
/// Best bid is the highest price (last key), best ask the lowest (first key).
/// No two levels on a side share a price.
#[derive(Debug)]
pub struct BookSide {
    pub side: Side,
    levels: BTreeMap<Decimal, PriceLevel>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Add a limit order with positive remaining quantity at the FIFO tail of
    /// its level, creating the level if needed.
    pub fn insert(&mut self, order: Order) -> Result<(), EngineError> {
        if order.is_market_order() {
            return Err(EngineError::InvalidOrder(
                "market orders cannot rest in the book".to_string(),
            ));
        }
        if order.remaining_quantity() == 0 {
            return Err(EngineError::InvalidOrder(
                "resting order must have positive remaining quantity".to_string(),
            ));
        }
        let price = order.price.ok_or_else(|| {
            EngineError::InvalidOrder("resting limit order must carry a price".to_string())
        })?;

        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(order);
        Ok(())
    }

    /// Best price on this side, `None` when empty.
    pub fn best_price(&self) -> Option<Decimal> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    pub(crate) fn best_level_mut(&mut self) -> Option<&mut PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values_mut().next_back(),
            Side::Sell => self.levels.values_mut().next(),
        }
    }

    pub fn level(&self, price: Decimal) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Drop the level at `price` once its last order has been consumed.
    pub(crate) fn remove_level_if_empty(&mut self, price: Decimal) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    fn remove_order(&mut self, price: Decimal, order_id: OrderId) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let order = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(order)
    }

    /// Top `num_levels` levels as `(price, total_quantity)`, best first.
    pub fn depth(&self, num_levels: usize) -> Vec<(Decimal, u64)> {
        let iter: Box<dyn Iterator<Item = &PriceLevel>> = match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        };

        iter.take(num_levels)
            .map(|level| (level.price, level.total_quantity()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// ============================================================================
// Order Book
// ============================================================================

/// The full two-sided book for one instrument.
///
/// Holds no order with zero remaining quantity, and outside a match pass the
/// best bid is strictly below the best ask. The id index exists for
/// cancellation lookup only.
#[derive(Debug)]
pub struct OrderBook {
    symbol: String,
    bids: BookSide,
    asks: BookSide,
    index: HashMap<OrderId, (Side, Decimal)>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            index: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_price()
    }

    /// Rest a limit order and index it for cancellation.
    pub(crate) fn insert(&mut self, order: Order) -> Result<(), EngineError> {
        let id = order.id;
        let side = order.side;
        let price = order.price;

        self.side_mut(side).insert(order)?;

        // insert() verified the price above
        if let Some(price) = price {
            self.index.insert(id, (side, price));
        }
        Ok(())
    }

    /// Remove a resting order, e.g. on cancellation. `NotFound` when the id
    /// is not currently resting (already filled or already cancelled).
    pub(crate) fn remove_resting(&mut self, order_id: OrderId) -> Result<Order, EngineError> {
        let (side, price) = self
            .index
            .remove(&order_id)
            .ok_or(EngineError::NotFound(order_id))?;

        let order = self.side_mut(side).remove_order(price, order_id);
        debug_assert!(order.is_some(), "indexed order {} missing from level", order_id);
        order.ok_or(EngineError::NotFound(order_id))
    }

    /// Drop the cancellation index entry for a fully consumed maker.
    pub(crate) fn forget(&mut self, order_id: OrderId) {
        self.index.remove(&order_id);
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        OrderBookSnapshot::with_depth(
            self.symbol.clone(),
            self.bids.depth(depth),
            self.asks.depth(depth),
        )
    }
}

// ============================================================================
// Order Book Snapshot
// ============================================================================

/// Immutable point-in-time view of the book for market data consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub symbol: String,
    /// Bid levels `(price, total_quantity)`, best first
    pub bids: Vec<(Decimal, u64)>,
    /// Ask levels `(price, total_quantity)`, best first
    pub asks: Vec<(Decimal, u64)>,
    /// Current spread (ask - bid)
    pub spread: Option<Decimal>,
    /// Mid price
    pub mid_price: Option<Decimal>,
}

impl OrderBookSnapshot {
    pub fn with_depth(
        symbol: String,
        bids: Vec<(Decimal, u64)>,
        asks: Vec<(Decimal, u64)>,
    ) -> Self {
        let spread = match (bids.first(), asks.first()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        };

        let mid_price = match (bids.first(), asks.first()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        };

        Self {
            symbol,
            bids,
            asks,
            spread,
            mid_price,
        }
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|(price, _)| *price)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|(price, _)| *price)
    }

    pub fn total_bid_quantity(&self) -> u64 {
        self.bids.iter().map(|(_, quantity)| quantity).sum()
    }

    pub fn total_ask_quantity(&self) -> u64 {
        self.asks.iter().map(|(_, quantity)| quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderType;
    use chrono::Utc;

    fn resting(id: u64, side: Side, quantity: u64, price: i64) -> Order {
        Order::new(
            OrderId::new(id),
            side,
            OrderType::Limit,
            Some(Decimal::from(price)),
            quantity,
            Utc::now(),
        )
    }

    #[test]
    fn test_price_level_fifo_and_totals() {
        let mut side = BookSide::new(Side::Sell);
        side.insert(resting(1, Side::Sell, 300, 100)).unwrap();
        side.insert(resting(2, Side::Sell, 400, 100)).unwrap();

        let level = side.level(Decimal::from(100)).unwrap();
        assert_eq!(level.total_quantity(), 700);
        assert_eq!(level.len(), 2);
        // Head is the earliest arrival
        assert_eq!(level.front().unwrap().id, OrderId::new(1));
    }

    #[test]
    fn test_best_price_ordering() {
        let mut bids = BookSide::new(Side::Buy);
        bids.insert(resting(1, Side::Buy, 10, 99)).unwrap();
        bids.insert(resting(2, Side::Buy, 10, 101)).unwrap();
        bids.insert(resting(3, Side::Buy, 10, 100)).unwrap();
        assert_eq!(bids.best_price(), Some(Decimal::from(101)));

        let mut asks = BookSide::new(Side::Sell);
        asks.insert(resting(4, Side::Sell, 10, 105)).unwrap();
        asks.insert(resting(5, Side::Sell, 10, 103)).unwrap();
        assert_eq!(asks.best_price(), Some(Decimal::from(103)));
    }

    #[test]
    fn test_insert_rejects_market_order() {
        let mut side = BookSide::new(Side::Buy);
        let order = Order::new(
            OrderId::new(1),
            Side::Buy,
            OrderType::Market,
            None,
            100,
            Utc::now(),
        );

        assert!(matches!(
            side.insert(order),
            Err(EngineError::InvalidOrder(_))
        ));
        assert!(side.is_empty());
    }

    #[test]
    fn test_depth_best_first() {
        let mut bids = BookSide::new(Side::Buy);
        for (id, price) in [(1, 98), (2, 100), (3, 99)] {
            bids.insert(resting(id, Side::Buy, 10, price)).unwrap();
        }

        let depth = bids.depth(2);
        assert_eq!(
            depth,
            vec![(Decimal::from(100), 10), (Decimal::from(99), 10)]
        );
    }

    #[test]
    fn test_remove_resting_drops_empty_level() {
        let mut book = OrderBook::new("ACME");
        book.insert(resting(1, Side::Sell, 700, 100)).unwrap();
        assert!(book.contains(OrderId::new(1)));

        let removed = book.remove_resting(OrderId::new(1)).unwrap();
        assert_eq!(removed.remaining_quantity(), 700);
        assert!(book.asks().is_empty());
        assert!(!book.contains(OrderId::new(1)));
    }

    #[test]
    fn test_remove_resting_not_found() {
        let mut book = OrderBook::new("ACME");
        assert!(matches!(
            book.remove_resting(OrderId::new(42)),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_snapshot_spread_and_mid() {
        let mut book = OrderBook::new("ACME");
        book.insert(resting(1, Side::Buy, 10, 99)).unwrap();
        book.insert(resting(2, Side::Sell, 20, 101)).unwrap();

        let snapshot = book.snapshot(10);
        assert_eq!(snapshot.best_bid(), Some(Decimal::from(99)));
        assert_eq!(snapshot.best_ask(), Some(Decimal::from(101)));
        assert_eq!(snapshot.spread, Some(Decimal::from(2)));
        assert_eq!(snapshot.mid_price, Some(Decimal::from(100)));
        assert_eq!(snapshot.total_ask_quantity(), 20);
    }
}
