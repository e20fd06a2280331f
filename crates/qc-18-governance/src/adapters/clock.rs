//! Manually driven clock for simulations and tests.

use crate::domain::Timepoint;
use crate::ports::TimeSource;
use std::sync::atomic::{AtomicU64, Ordering};

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    time: AtomicU64,
}

impl ManualTimeSource {
    /// Creates a clock at `initial`.
    #[must_use]
    pub fn new(initial: Timepoint) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: u64) {
        self.time.fetch_add(delta, Ordering::SeqCst);
    }

    /// Sets the clock.
    pub fn set(&self, time: Timepoint) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timepoint {
        self.time.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualTimeSource::new(100);
        assert_eq!(clock.now(), 100);
        clock.advance(5);
        assert_eq!(clock.now(), 105);
        clock.set(7);
        assert_eq!(clock.now(), 7);
    }
}
