// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod clock;
mod event_handler;

pub use clock::{Clock, SystemClock};
pub use event_handler::{
    EventHandler, LoggingEventHandler, NoOpEventHandler, OrderEvent, RecordingEventHandler,
};

#[cfg(test)]
pub(crate) use clock::test_support::FixedClock;
