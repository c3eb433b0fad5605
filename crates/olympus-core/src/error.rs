//! Error types for olympus-core
//!
//! Errors fall into three classes:
//! - expected: creation denials and missing delegation rights, handled by routing
//! - defects: registry inconsistencies that indicate a bug in the caller
//! - external: execution backend and configuration failures

use crate::hierarchy::AgentId;
use crate::policy::Denial;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Safety policy refused to admit a new agent
    #[error("agent creation denied: {0}")]
    CreationDenied(Denial),

    /// The requesting agent holds no delegation capability
    #[error("agent '{0}' is not permitted to create sub-agents")]
    DelegationNotPermitted(AgentId),

    /// An agent with this id is already registered
    #[error("duplicate agent id: {0}")]
    DuplicateId(AgentId),

    /// Parent is neither the root sentinel nor an active agent
    #[error("unknown or inactive parent agent: {0}")]
    UnknownParent(AgentId),

    /// No record exists for the id
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Persona label does not resolve to a preset
    #[error("unknown persona: {0}")]
    UnknownPersona(String),

    /// Task execution failed (backend or local workflow)
    #[error("execution error: {0}")]
    Execution(String),

    /// Configuration error (invalid limits or weights)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error (serialization, I/O)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Expected conditions that callers react to by changing route
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CreationDenied(_) | Self::DelegationNotPermitted(_))
    }

    /// Conditions that only occur when the registry is used incorrectly
    #[must_use]
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId(_) | Self::UnknownParent(_) | Self::NotFound(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::CreationDenied(denial) => {
                format!("⛔ Sub-agent was not created: {}", denial)
            }
            Error::DelegationNotPermitted(id) => {
                format!("🔒 Agent '{}' cannot create sub-agents.", id)
            }
            Error::DuplicateId(id) => format!("❌ Agent id '{}' is already in use.", id),
            Error::UnknownParent(id) => {
                format!("❌ Parent agent '{}' is unknown or no longer active.", id)
            }
            Error::NotFound(id) => format!("❌ Agent '{}' does not exist.", id),
            Error::UnknownPersona(name) => format!("🏛️ Persona '{}' is not in the pantheon.", name),
            Error::Execution(msg) => format!("⚡ Execution failed: {}", msg),
            Error::Configuration(msg) => format!("⚙️ Configuration error: {}", msg),
            Error::Internal(msg) => format!("❌ Internal error: {}", msg),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::CreationDenied(Denial::MaxTotalAgents) => Some(
                "💡 Release finished agents or raise safety.max_total_agents.".to_string(),
            ),
            Error::CreationDenied(Denial::MaxDepthExceeded) => {
                Some("💡 Flatten the delegation chain or raise safety.max_depth.".to_string())
            }
            Error::CreationDenied(Denial::LabelNotPermitted) => {
                Some("💡 Add the persona label to safety.allowed_labels.".to_string())
            }
            Error::CreationDenied(Denial::RateLimited) => {
                Some("💡 Wait for the rate window to pass before spawning again.".to_string())
            }
            Error::UnknownPersona(_) => {
                Some("💡 Run `olympus pantheon` to list available personas.".to_string())
            }
            Error::Configuration(_) => {
                Some("💡 Check config/default.toml or OLYMPUS_* environment variables.".to_string())
            }
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();
    output.push('\n');

    if let Some(suggestion) = error.suggestion() {
        output.push('\n');
        output.push_str(&suggestion);
        output.push('\n');
    }

    output
}
