use crate::hierarchy::AgentId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Resolves a persona label to the capability set it is configured with
pub trait CapabilityResolver: Send + Sync {
    /// Capabilities for `label`, or `None` when the label is unknown
    fn capabilities_for(&self, label: &str) -> Option<BTreeSet<String>>;
}

/// Best-effort cleanup run after an agent is deregistered
pub type CleanupCallback = Box<dyn FnOnce(&AgentId) -> anyhow::Result<()> + Send>;

/// Options for [`LifecycleManager::create_sub_agent`](super::LifecycleManager::create_sub_agent)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Grant the new handle the right to create its own sub-agents
    pub allow_agent_creation: bool,
    /// Narrow the inherited capability set (never widens it)
    pub capabilities: Option<BTreeSet<String>>,
}

impl CreateOptions {
    /// Options for a delegate that may nest further
    #[must_use]
    pub fn delegating() -> Self {
        Self {
            allow_agent_creation: true,
            capabilities: None,
        }
    }

    /// Restrict capabilities to `caps`
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, caps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = Some(caps.into_iter().map(Into::into).collect());
        self
    }
}

/// What a caller receives for an admitted agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentHandle {
    /// Agent id
    pub id: AgentId,
    /// Creator
    pub parent_id: AgentId,
    /// Registered depth
    pub depth: u32,
    /// Persona label
    pub label: String,
    /// Capabilities, always a subset of the parent's
    pub capabilities: BTreeSet<String>,
    /// Whether this handle may create sub-agents
    pub can_delegate: bool,
}

impl AgentHandle {
    /// Check a capability
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}
