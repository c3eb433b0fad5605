//! Sliding window bookkeeping for creation-rate limits
//!
//! Unlike a request limiter this type never decides anything: it records
//! timestamps per key and answers "how many inside the last `window`". The
//! owner holds it behind its own lock, so no interior locking here.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Keyed sliding window of event timestamps
#[derive(Debug, Default, Clone)]
pub struct SlidingWindow {
    /// Map of key -> timestamps, oldest first
    events: HashMap<String, VecDeque<Instant>>,
}

impl SlidingWindow {
    /// Create an empty window
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event for `key` now
    pub fn record(&mut self, key: &str) {
        self.record_at(key, Instant::now());
    }

    /// Record an event for `key` at a given instant
    pub fn record_at(&mut self, key: &str, at: Instant) {
        let events = self.events.entry(key.to_string()).or_default();
        // Keep oldest-first ordering even if callers pass instants out of order
        let pos = events.iter().rposition(|t| *t <= at).map_or(0, |i| i + 1);
        events.insert(pos, at);
    }

    /// Count events for `key` inside the last `window`
    #[must_use]
    pub fn count_within(&self, key: &str, window: Duration) -> usize {
        self.count_within_at(key, window, Instant::now())
    }

    /// Count events for `key` inside `window` ending at `now`
    #[must_use]
    pub fn count_within_at(&self, key: &str, window: Duration, now: Instant) -> usize {
        let Some(events) = self.events.get(key) else {
            return 0;
        };

        match now.checked_sub(window) {
            Some(window_start) => events.iter().filter(|t| **t > window_start).count(),
            None => events.len(),
        }
    }

    /// Drop events older than `max_age`; returns the number of keys removed
    pub fn prune(&mut self, max_age: Duration) -> usize {
        let Some(cutoff) = Instant::now().checked_sub(max_age) else {
            return 0;
        };

        let initial = self.events.len();
        self.events.retain(|_, events| {
            while events.front().is_some_and(|t| *t <= cutoff) {
                events.pop_front();
            }
            !events.is_empty()
        });
        initial - self.events.len()
    }

    /// Number of keys with at least one retained event
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.events.len()
    }
}
