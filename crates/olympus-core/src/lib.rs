//! Olympus Core - Agent Safety & Hierarchy Engine
//!
//! This crate provides the control layer that governs how Olympus personas
//! (Zeus and its delegates) create sub-agents, including:
//! - Hierarchy: bookkeeping of every live or recently-live agent
//! - Policy: safety limits on agent count, nesting depth, labels and spawn rate
//! - Lifecycle: the only mutation API (create, release, sweep)
//! - Complexity: task scoring used for routing
//! - Router: deterministic vs delegated execution with mandatory fallback
//! - Pantheon: persona presets (who may delegate to whom, local workflows)
//! - Event bus: the observability sink for lifecycle and routing events

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod complexity;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod hierarchy;
pub mod lifecycle;
pub mod pantheon;
pub mod persona;
pub mod policy;
pub mod router;
pub mod utils;

pub use complexity::{ComplexityAnalyzer, ComplexityScore};
pub use config::{
    ComplexityWeights, EventConfig, LifecycleConfig, OlympusConfig, OrchestrationConfig,
    SafetyConfig,
};
pub use error::{format_error_for_cli, Error, Result, UserFriendlyError};
pub use event_bus::{EventBus, EventHook, OlympusEvent};
pub use hierarchy::{
    AgentId, AgentRecord, AgentStatus, AuditEntry, HierarchyRegistry, HierarchyTree, TreeNode,
};
pub use lifecycle::{
    spawn_sweeper, AgentHandle, CapabilityResolver, CleanupCallback, CreateOptions,
    InspectionReport, LifecycleManager,
};
pub use pantheon::{Domain, PersonaCatalog, PersonaLoader, PersonaPreset};
pub use persona::{NestedBackend, Persona};
pub use policy::{Denial, PolicyDecision, SafetyPolicy};
pub use router::{
    DeterministicWorkflow, ExecutionBackend, ExecutionPath, OrchestrationRouter,
    RouterMetricsSnapshot, TaskOutcome,
};
pub use utils::{Counter, SlidingWindow};
