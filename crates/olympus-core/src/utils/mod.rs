//! Utility modules for olympus-core
//!
//! Provides common utilities:
//! - rate_limiter: keyed sliding window of event timestamps
//! - metrics: lock-free counters for routing observability

mod metrics;
mod rate_limiter;

pub use metrics::Counter;
pub use rate_limiter::SlidingWindow;
