//! Timestamp sources for flushed records

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Source of capture timestamps in microseconds
pub trait Clock {
    fn now_us(&self) -> u64;
}

/// Wall clock, microseconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_us(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }
}

/// Monotonic clock, microseconds since construction
///
/// Mirrors an absolute boot-time counter: never goes backwards.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

impl<F> Clock for F
where
    F: Fn() -> u64,
{
    #[inline]
    fn now_us(&self) -> u64 {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_monotonic_never_decreases() {
        let clock = MonotonicClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }

    #[test]
    fn test_system_clock_after_epoch() {
        assert!(SystemClock.now_us() > 0);
    }

    #[test]
    fn test_closure_clock() {
        let ticks = Cell::new(0u64);
        let clock = || {
            ticks.set(ticks.get() + 10);
            ticks.get()
        };
        assert_eq!(clock.now_us(), 10);
        assert_eq!(clock.now_us(), 20);
    }
}
