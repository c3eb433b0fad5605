//! Agent identity and record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of the root sentinel (the top-level persona)
pub const ROOT_ID: &str = "root";

/// Unique agent identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The root sentinel
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    /// Fresh identifier prefixed with the persona label, e.g. `coder-3f2a…`
    #[must_use]
    pub fn generate(label: &str) -> Self {
        let prefix: String = label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let prefix = if prefix.is_empty() { "agent" } else { prefix.as_str() };
        Self(format!("{}-{}", prefix, Uuid::new_v4().simple()))
    }

    /// Whether this is the root sentinel
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }

    /// Borrow as str
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Agent status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Counted against the safety limits
    Active,
    /// Released; kept until the retention window passes
    Inactive,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// One record per live or recently-live agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Unique identifier, immutable
    pub id: AgentId,
    /// Creator, or the root sentinel
    pub parent_id: AgentId,
    /// Distance from the root sentinel, fixed at registration
    pub depth: u32,
    /// Registration time
    pub created_at: DateTime<Utc>,
    /// Current status
    pub status: AgentStatus,
    /// Persona label (informational)
    pub label: String,
}

impl AgentRecord {
    /// Whether the record still counts against the limits
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }
}

/// Append-only registration log entry (diagnostics only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Registered agent
    pub agent_id: AgentId,
    /// Its parent
    pub parent_id: AgentId,
    /// Depth at registration
    pub depth: u32,
    /// Persona label
    pub label: String,
    /// Registration time
    pub at: DateTime<Utc>,
}
