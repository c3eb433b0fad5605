use crate::utils::Counter;
use serde::Serialize;

/// Router counters; observability only, never read by routing
#[derive(Debug, Default)]
pub(crate) struct RouterMetrics {
    pub(crate) deterministic: Counter,
    pub(crate) delegated: Counter,
    pub(crate) sub_agents_created: Counter,
    pub(crate) fallbacks: Counter,
}

impl RouterMetrics {
    pub(crate) fn snapshot(&self) -> RouterMetricsSnapshot {
        RouterMetricsSnapshot {
            deterministic: self.deterministic.get(),
            delegated: self.delegated.get(),
            sub_agents_created: self.sub_agents_created.get(),
            fallbacks: self.fallbacks.get(),
        }
    }
}

/// Point-in-time copy of the router counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouterMetricsSnapshot {
    /// Tasks routed straight to the local workflow
    pub deterministic: u64,
    /// Tasks routed to the delegated path
    pub delegated: u64,
    /// Delegates successfully created
    pub sub_agents_created: u64,
    /// Delegated attempts that fell back to the local workflow
    pub fallbacks: u64,
}
