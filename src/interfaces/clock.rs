// ============================================================================
// Clock Interface
// Time source for fill and event timestamps
// ============================================================================

use chrono::{DateTime, Utc};

/// Monotonic-enough time source supplied by the surrounding system.
///
/// The engine never generates timestamps with any particular algorithm of
/// its own; tests substitute a fixed clock for deterministic output.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used by default.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FixedClock;
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let instant = Utc::now();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
    }
}
