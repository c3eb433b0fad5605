//! Safety policy: admission rules for new agents.
//!
//! A pure decision function over the hierarchy registry and immutable limits.
//! Checks run in a fixed order and the first failing check wins:
//!   1. total active agents
//!   2. depth of the would-be child
//!   3. label allow-list
//!   4. per-parent creation rate
//!
//! Denials are returned as data, not errors. Only the lifecycle manager turns
//! a denial into [`Error::CreationDenied`](crate::Error::CreationDenied).

use crate::config::SafetyConfig;
use crate::error::Result;
use crate::hierarchy::{AgentId, HierarchyRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason an agent creation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// Active agent count is at the cap
    MaxTotalAgents,
    /// Child would sit deeper than `max_depth`
    MaxDepthExceeded,
    /// Label is not in the allow-list
    LabelNotPermitted,
    /// Parent spawned too many agents inside the rate window
    RateLimited,
}

impl Denial {
    /// Human-readable reason
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MaxTotalAgents => "Maximum total agents reached",
            Self::MaxDepthExceeded => "Maximum depth exceeded",
            Self::LabelNotPermitted => "Label not permitted for this agent",
            Self::RateLimited => "Rate limit exceeded",
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for Denial {}

/// Outcome of [`SafetyPolicy::can_create`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyDecision {
    /// Whether creation may proceed
    pub allowed: bool,
    /// Why it may not, when denied
    pub reason: Option<Denial>,
}

impl PolicyDecision {
    /// An allowing decision
    #[must_use]
    pub const fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// A denying decision
    #[must_use]
    pub const fn deny(reason: Denial) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    /// Convert into a `Result` for `?`-style callers
    pub fn into_result(self) -> std::result::Result<(), Denial> {
        match self.reason {
            Some(denial) if !self.allowed => Err(denial),
            _ => Ok(()),
        }
    }
}

/// Agent creation policy.
#[derive(Debug, Clone, Default)]
pub struct SafetyPolicy {
    config: SafetyConfig,
}

impl SafetyPolicy {
    /// Create a policy from immutable limits
    #[must_use]
    pub fn new(config: SafetyConfig) -> Self {
        Self { config }
    }

    /// The configured limits
    #[must_use]
    pub fn config(&self) -> &SafetyConfig {
        &self.config
    }

    /// Decide whether `parent_id` may create an agent labelled `requested_label`.
    ///
    /// # Errors
    /// `NotFound` when `parent_id` is neither root nor a known record and the
    /// total-cap check did not already deny.
    pub fn can_create(
        &self,
        registry: &HierarchyRegistry,
        parent_id: &AgentId,
        requested_label: &str,
    ) -> Result<PolicyDecision> {
        // 1. Total cap first: it must win even when depth would also fail
        if registry.count_active() >= self.config.max_total_agents {
            return Ok(PolicyDecision::deny(Denial::MaxTotalAgents));
        }

        // 2. Depth of the would-be child
        let depth = registry.get_depth(parent_id)? + 1;
        if depth > self.config.max_depth {
            return Ok(PolicyDecision::deny(Denial::MaxDepthExceeded));
        }

        // 3. Label allow-list (empty = unrestricted)
        if !self.config.allowed_labels.is_empty()
            && !label_listed(&self.config.allowed_labels, requested_label)
        {
            return Ok(PolicyDecision::deny(Denial::LabelNotPermitted));
        }

        // 4. Per-parent creation rate
        let recent = registry.creations_within(parent_id, self.config.rate_window());
        if recent >= self.config.rate_limit_count as usize {
            return Ok(PolicyDecision::deny(Denial::RateLimited));
        }

        Ok(PolicyDecision::allow())
    }
}

/// Whether `label` appears in `labels`, ignoring ASCII case and surrounding
/// whitespace. Every label allow-list in the crate matches this way.
pub(crate) fn label_listed<'a, I>(labels: I, label: &str) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    let label = label.trim();
    labels
        .into_iter()
        .any(|allowed| allowed.trim().eq_ignore_ascii_case(label))
}
