// ============================================================================
// Price/Time Priority Matching (FIFO)
// The matching discipline used by traditional equity exchanges
// ============================================================================

use rust_decimal::Decimal;

use crate::domain::{Fill, Order, OrderBook, Side};
use crate::interfaces::Clock;

/// Price/Time priority (FIFO) match pass.
///
/// Better prices are exhausted before a worse price is touched; within one
/// price level orders fill in strict arrival order. The trade price is always
/// the resting (maker) order's price.
///
/// # Example
/// ```text
/// Book:  100 @ 300 shares (Order A, t=100)
///        100 @ 400 shares (Order B, t=101)
///
/// Incoming: Buy 500 @ 100
/// Result: fill 300 with A, then 200 with B; B keeps its queue position
/// ```
pub struct PriceTimePriority;

impl PriceTimePriority {
    pub fn new() -> Self {
        Self
    }

    /// Whether an incoming order may trade at `book_price` on the opposing
    /// side. Market orders cross any price.
    pub fn prices_cross(&self, incoming: &Order, book_price: Decimal) -> bool {
        let Some(price) = incoming.price else {
            return true;
        };
        match incoming.side {
            Side::Buy => price >= book_price,
            Side::Sell => price <= book_price,
        }
    }

    /// Run one synchronous match pass for `incoming` against the opposing
    /// side of `book`, mutating maker remainders in place.
    ///
    /// The caller holds the book lock for the whole pass; fills are returned
    /// in generation order.
    pub fn match_order(
        &self,
        incoming: &mut Order,
        book: &mut OrderBook,
        clock: &dyn Clock,
    ) -> Vec<Fill> {
        let mut fills = Vec::new();
        let opposing = incoming.side.opposite();

        while incoming.remaining_quantity() > 0 {
            let Some(best_price) = book.side(opposing).best_price() else {
                break;
            };
            if !self.prices_cross(incoming, best_price) {
                break;
            }

            let mut consumed_makers = Vec::new();
            {
                let side = book.side_mut(opposing);
                // best_price was read from this side under the same lock
                let level = side
                    .best_level_mut()
                    .expect("best price without a best level");
                debug_assert_eq!(level.price, best_price);

                while incoming.remaining_quantity() > 0 {
                    let (matched, maker_id, maker_done) = {
                        let Some(maker) = level.front_mut() else {
                            break;
                        };
                        let matched =
                            incoming.remaining_quantity().min(maker.remaining_quantity());
                        maker.fill(matched);
                        (matched, maker.id, maker.remaining_quantity() == 0)
                    };

                    incoming.fill(matched);
                    level.reduce(matched);

                    fills.push(Fill::new(
                        incoming.id,
                        maker_id,
                        best_price,
                        matched,
                        clock.now(),
                    ));

                    if maker_done {
                        let done = level.pop_front().expect("head maker just filled");
                        debug_assert_eq!(done.id, maker_id);
                        consumed_makers.push(done.id);
                    }
                }

                side.remove_level_if_empty(best_price);
            }

            for maker_id in consumed_makers {
                book.forget(maker_id);
            }
        }

        fills
    }
}

impl Default for PriceTimePriority {
    fn default() -> Self {
        Self::new()
    }
}
