use crate::hierarchy::AgentId;
use crate::policy::Denial;
use serde::Serialize;

/// Events emitted by the lifecycle manager and the orchestration router.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OlympusEvent {
    /// A sub-agent was admitted and registered
    #[serde(rename = "agent:created")]
    AgentCreated {
        /// New agent
        agent_id: AgentId,
        /// Its creator
        parent_id: AgentId,
        /// Registered depth
        depth: u32,
        /// Persona label
        label: String,
    },
    /// An agent was deregistered
    #[serde(rename = "agent:released")]
    AgentReleased {
        /// Released agent
        agent_id: AgentId,
        /// Cleanup callbacks that returned an error
        cleanup_failures: usize,
    },
    /// The safety policy refused a creation request
    #[serde(rename = "agent:creation-denied")]
    CreationDenied {
        /// Requesting parent
        parent_id: AgentId,
        /// Requested label
        label: String,
        /// Structured denial
        reason: Denial,
    },
    /// A task ran the local workflow
    #[serde(rename = "orchestration:deterministic")]
    Deterministic {
        /// Persona that received the task
        caller: AgentId,
        /// Overall complexity score
        score: u8,
    },
    /// A task was handed to a new delegate
    #[serde(rename = "orchestration:delegated")]
    Delegated {
        /// Persona that received the task
        caller: AgentId,
        /// Delegate that executed it
        delegate_id: AgentId,
        /// Overall complexity score
        score: u8,
    },
    /// The delegated path failed and the local workflow took over
    #[serde(rename = "orchestration:fallback")]
    Fallback {
        /// Persona that received the task
        caller: AgentId,
        /// Why delegation was abandoned
        cause: String,
    },
}

impl OlympusEvent {
    /// Wire name of the event
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AgentCreated { .. } => "agent:created",
            Self::AgentReleased { .. } => "agent:released",
            Self::CreationDenied { .. } => "agent:creation-denied",
            Self::Deterministic { .. } => "orchestration:deterministic",
            Self::Delegated { .. } => "orchestration:delegated",
            Self::Fallback { .. } => "orchestration:fallback",
        }
    }
}
