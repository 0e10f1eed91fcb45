//! Input coalescing for free-text controls.
//!
//! Time is always passed in by the caller, so the state machines here never
//! read a clock and can be driven deterministically in tests.

use std::time::{Duration, Instant};

/// Holds the latest value of one control until the input goes quiet.
///
/// Each [`trigger`](Debouncer::trigger) replaces the pending value and
/// restarts the quiet window. [`poll`](Debouncer::poll) hands the value out
/// once the window has elapsed, then the slot is empty again.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records new input at `now`, discarding any value still waiting.
    pub fn trigger(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Returns the pending value if `now` is at least one full window after
    /// the last trigger.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value without firing.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

/// Issues strictly increasing request ids.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    counter: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }

    /// Most recently issued id, 0 before the first request.
    pub fn current(&self) -> u64 {
        self.counter
    }
}

/// Keeps only the newest completed result.
///
/// Completions may arrive out of order; one whose id is not newer than the
/// last accepted id is dropped.
#[derive(Debug, Clone)]
pub struct LatestResults<T> {
    accepted_id: u64,
    value: Option<T>,
}

impl<T> Default for LatestResults<T> {
    fn default() -> Self {
        Self {
            accepted_id: 0,
            value: None,
        }
    }
}

impl<T> LatestResults<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers the result of request `id`. Returns `true` if it was kept.
    pub fn offer(&mut self, id: u64, value: T) -> bool {
        if id <= self.accepted_id {
            return false;
        }
        self.accepted_id = id;
        self.value = Some(value);
        true
    }

    pub fn accepted_id(&self) -> u64 {
        self.accepted_id
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}
