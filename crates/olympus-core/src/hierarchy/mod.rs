//! Hierarchy Registry
//!
//! The system of record for every live or recently-live agent. Each record
//! stores its parent and a depth computed once at registration; nothing
//! recomputes depth afterwards, so purging unrelated records never shifts it.
//!
//! ```text
//! root (sentinel, depth 0)
//!  ├─ athena-…     depth 1
//!  │   └─ hephaestus-…  depth 2
//!  └─ hermes-…     depth 1
//! ```
//!
//! The registry is a plain data structure. Serializing access is the job of
//! the lifecycle manager, which owns it behind a single lock.

mod registry;
mod tree;
mod types;

pub use registry::{HierarchyRegistry, DEFAULT_AUDIT_CAPACITY};
pub use tree::{HierarchyTree, TreeNode};
pub use types::{AgentId, AgentRecord, AgentStatus, AuditEntry, ROOT_ID};
