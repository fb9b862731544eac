//! Button debounce filter
//!
//! An edge is genuine when it reverses the last accepted button level and
//! arrives at least one threshold after the previously accepted edge.
//! Everything else is contact bounce or a repeated report of the same edge.

use embassy_time::{Duration, Instant};

use crate::state::ButtonLevel;

/// Timestamp of the last accepted edge plus the debounce threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceClock {
    last: Option<Instant>,
    threshold: Duration,
}

impl DebounceClock {
    /// Create a clock that has not accepted any edge yet
    pub const fn new(threshold: Duration) -> Self {
        Self {
            last: None,
            threshold,
        }
    }

    pub const fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Timestamp of the last accepted edge
    pub const fn last_accepted(&self) -> Option<Instant> {
        self.last
    }

    /// Decide whether an edge sensed at `now` is genuine
    ///
    /// `current` is the last accepted level, `sensed` the level read from the
    /// pin. Only an accepted edge moves the clock forward.
    pub fn accept(&mut self, current: ButtonLevel, sensed: ButtonLevel, now: Instant) -> bool {
        if self.within_threshold(now) {
            return false;
        }
        if sensed == current {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Check whether `now` falls inside the window of the last accepted edge
    ///
    /// The tick counter is compared with a wrapping difference so a counter
    /// rollover reads as a short elapsed time instead of a huge one.
    fn within_threshold(&self, now: Instant) -> bool {
        let Some(last) = self.last else {
            return false;
        };
        let elapsed = now.as_ticks().wrapping_sub(last.as_ticks());
        elapsed < self.threshold.as_ticks()
    }
}
