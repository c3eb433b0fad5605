//! Engine configuration
//!
//! All limits are read once at startup and are immutable afterwards. Every
//! field has a serde default so partial TOML/env sources deserialize cleanly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Default cap on simultaneously active sub-agents
pub(crate) const DEFAULT_MAX_TOTAL_AGENTS: usize = 10;

/// Default max nesting depth (root = 0, first delegates = 1)
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default complexity threshold; scores above it take the delegated path
pub(crate) const DEFAULT_THRESHOLD: u8 = 5;

/// Safety limits evaluated before any agent is admitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Maximum number of simultaneously active agents
    #[serde(default = "default_max_total_agents")]
    pub max_total_agents: usize,
    /// Maximum depth of any agent in the hierarchy
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Sliding window for the per-parent creation rate cap (ms)
    #[serde(default = "default_rate_window_ms")]
    pub rate_window_ms: u64,
    /// Creations allowed per parent inside the window
    #[serde(default = "default_rate_limit_count")]
    pub rate_limit_count: u32,
    /// Persona labels permitted for new agents (empty = unrestricted)
    #[serde(default)]
    pub allowed_labels: BTreeSet<String>,
}

fn default_max_total_agents() -> usize {
    DEFAULT_MAX_TOTAL_AGENTS
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_rate_window_ms() -> u64 {
    60_000
}

fn default_rate_limit_count() -> u32 {
    5
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            max_total_agents: default_max_total_agents(),
            max_depth: default_max_depth(),
            rate_window_ms: default_rate_window_ms(),
            rate_limit_count: default_rate_limit_count(),
            allowed_labels: BTreeSet::new(),
        }
    }
}

impl SafetyConfig {
    /// Rate window as a [`Duration`]
    #[must_use]
    pub fn rate_window(&self) -> Duration {
        Duration::from_millis(self.rate_window_ms)
    }

    /// Set the total agent cap
    #[must_use]
    pub fn with_max_total_agents(mut self, max: usize) -> Self {
        self.max_total_agents = max;
        self
    }

    /// Set the depth cap
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the per-parent rate limit
    #[must_use]
    pub fn with_rate_limit(mut self, count: u32, window: Duration) -> Self {
        self.rate_limit_count = count;
        self.rate_window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Restrict new agents to the given labels
    #[must_use]
    pub fn with_allowed_labels(
        mut self,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Weights combining complexity sub-scores into the overall score
///
/// `overall = round((technical * technical_w + uncertainty * uncertainty_w
/// + domains * domain_w) / divisor)`, clamped to 0..=10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityWeights {
    /// Weight of the technical sub-score
    #[serde(default = "default_unit_weight")]
    pub technical: f32,
    /// Weight of the uncertainty sub-score
    #[serde(default = "default_unit_weight")]
    pub uncertainty: f32,
    /// Weight applied per recognized domain
    #[serde(default = "default_domain_weight")]
    pub domain: f32,
    /// Normalizing divisor
    #[serde(default = "default_divisor")]
    pub divisor: f32,
}

fn default_unit_weight() -> f32 {
    1.0
}

fn default_domain_weight() -> f32 {
    1.5
}

fn default_divisor() -> f32 {
    3.0
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            technical: default_unit_weight(),
            uncertainty: default_unit_weight(),
            domain: default_domain_weight(),
            divisor: default_divisor(),
        }
    }
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    /// Scores at or below the threshold run the deterministic workflow
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Label requested for delegates created on the delegated path
    #[serde(default = "default_delegate_label")]
    pub delegate_label: String,
    /// Complexity weights
    #[serde(default)]
    pub weights: ComplexityWeights,
    /// Maximum domain count contributing to the score
    #[serde(default = "default_domain_cap")]
    pub domain_cap: u8,
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_delegate_label() -> String {
    "orchestrator".to_string()
}

fn default_domain_cap() -> u8 {
    6
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            delegate_label: default_delegate_label(),
            weights: ComplexityWeights::default(),
            domain_cap: default_domain_cap(),
        }
    }
}

/// Retention and sweeping of agent records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// How long inactive records are kept before purge (ms)
    #[serde(default = "default_retention_ms")]
    pub retention_ms: u64,
    /// Sweeper period in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    /// Active agents older than this are released by the sweeper (0 = never)
    #[serde(default)]
    pub agent_ttl_secs: u64,
}

fn default_retention_ms() -> u64 {
    3_600_000
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            retention_ms: default_retention_ms(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            agent_ttl_secs: 0,
        }
    }
}

impl LifecycleConfig {
    /// Retention window as a [`Duration`]
    #[must_use]
    pub fn retention(&self) -> Duration {
        Duration::from_millis(self.retention_ms)
    }

    /// Sweeper period as a [`Duration`]
    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Agent time-to-live, if enabled
    #[must_use]
    pub fn agent_ttl(&self) -> Option<Duration> {
        (self.agent_ttl_secs > 0).then(|| Duration::from_secs(self.agent_ttl_secs))
    }
}

/// Observability sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Broadcast buffer before slow subscribers lag
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

fn default_event_capacity() -> usize {
    256
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

/// Aggregated engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OlympusConfig {
    /// Safety limits
    #[serde(default)]
    pub safety: SafetyConfig,
    /// Routing
    #[serde(default)]
    pub orchestration: OrchestrationConfig,
    /// Record retention
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    /// Observability sink
    #[serde(default)]
    pub events: EventConfig,
}

impl OlympusConfig {
    /// Reject configurations that would break scoring or the rate window
    pub fn validate(&self) -> Result<()> {
        let w = &self.orchestration.weights;
        for (name, value) in [
            ("technical", w.technical),
            ("uncertainty", w.uncertainty),
            ("domain", w.domain),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Configuration(format!(
                    "orchestration.weights.{} must be a non-negative number",
                    name
                )));
            }
        }
        if !w.divisor.is_finite() || w.divisor <= 0.0 {
            return Err(Error::Configuration(
                "orchestration.weights.divisor must be positive".to_string(),
            ));
        }
        if self.orchestration.threshold > 10 {
            return Err(Error::Configuration(format!(
                "orchestration.threshold must be within 0..=10, got {}",
                self.orchestration.threshold
            )));
        }
        if self.orchestration.delegate_label.trim().is_empty() {
            return Err(Error::Configuration(
                "orchestration.delegate_label must not be empty".to_string(),
            ));
        }
        if self.lifecycle.cleanup_interval_secs == 0 {
            return Err(Error::Configuration(
                "lifecycle.cleanup_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.safety.rate_window_ms == 0 {
            return Err(Error::Configuration(
                "safety.rate_window_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
