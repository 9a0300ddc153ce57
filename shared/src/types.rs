//! Common types used across the workflow

#[cfg(test)]
use std::cell::Cell;

/// Millisecond wall-clock source used for invoice and transfer identifiers
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Clock that advances by a fixed step every time it is read
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct SteppingClock {
    next: Cell<i64>,
    step: i64,
}

#[cfg(test)]
impl SteppingClock {
    pub(crate) fn new(start: i64, step: i64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }
}

#[cfg(test)]
impl Clock for SteppingClock {
    fn now_millis(&self) -> i64 {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}
