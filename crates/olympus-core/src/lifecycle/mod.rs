//! Agent Lifecycle Manager
//!
//! The only mutation API over the hierarchy. The registry and per-agent
//! handle state sit behind a single mutex so the policy check and the
//! registration that follows it happen atomically: two concurrent requests
//! can never both take the last free slot.
//!
//! Events are published and cleanup callbacks run after the lock is released.

mod handle;
mod sweeper;

#[cfg(test)]
mod tests;

pub use handle::{AgentHandle, CapabilityResolver, CleanupCallback, CreateOptions};
pub use sweeper::spawn_sweeper;

use crate::config::SafetyConfig;
use crate::error::{Error, Result};
use crate::event_bus::{EventBus, OlympusEvent};
use crate::hierarchy::{AgentId, AgentRecord, HierarchyRegistry, HierarchyTree};
use crate::policy::{label_listed, Denial, SafetyPolicy};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Per-agent state that is not part of the registry record
struct HandleState {
    capabilities: BTreeSet<String>,
    can_delegate: bool,
    callbacks: Vec<CleanupCallback>,
}

#[derive(Default)]
struct State {
    registry: HierarchyRegistry,
    handles: HashMap<AgentId, HandleState>,
}

/// Read-only snapshot for debugging and tooling
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    /// Current hierarchy projection
    pub tree: HierarchyTree,
    /// Active agents
    pub active_count: usize,
    /// Retained records, active and inactive
    pub total_records: usize,
    /// Deepest registration ever made
    pub max_depth_observed: u32,
    /// Registrations per parent, for root and retained parents
    pub creations_per_parent: BTreeMap<AgentId, usize>,
}

impl InspectionReport {
    /// Pretty-printed JSON
    ///
    /// # Errors
    /// `Internal` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Internal(e.to_string()))
    }
}

/// Sole entry point for creating and destroying agents
pub struct LifecycleManager {
    state: Mutex<State>,
    policy: SafetyPolicy,
    events: Arc<EventBus>,
    resolver: Option<Arc<dyn CapabilityResolver>>,
    root_capabilities: BTreeSet<String>,
}

impl LifecycleManager {
    /// Create a manager with the given limits and observability sink
    #[must_use]
    pub fn new(config: SafetyConfig, events: Arc<EventBus>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            policy: SafetyPolicy::new(config),
            events,
            resolver: None,
            root_capabilities: BTreeSet::new(),
        }
    }

    /// Capabilities held by the root persona; the ceiling for every agent
    #[must_use]
    pub fn with_root_capabilities<I, S>(mut self, caps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_capabilities = caps.into_iter().map(Into::into).collect();
        self
    }

    /// Persona factory consulted for a label's configured capabilities
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn CapabilityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The admission policy
    #[must_use]
    pub fn policy(&self) -> &SafetyPolicy {
        &self.policy
    }

    /// The observability sink
    #[must_use]
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Capabilities held by the root persona
    #[must_use]
    pub fn root_capabilities(&self) -> &BTreeSet<String> {
        &self.root_capabilities
    }

    /// Create and register a sub-agent of `parent_id`.
    ///
    /// # Errors
    /// - `DelegationNotPermitted` if the parent was created without delegation rights
    /// - `CreationDenied` if the safety policy refuses
    /// - `NotFound` / `UnknownParent` for a stale or unknown parent (defects)
    pub fn create_sub_agent(
        &self,
        parent_id: &AgentId,
        label: &str,
        options: CreateOptions,
    ) -> Result<AgentHandle> {
        self.create_sub_agent_with(parent_id, label, options, None)
    }

    /// Like [`create_sub_agent`](Self::create_sub_agent), with the parent's own
    /// delegate list applied before the safety policy.
    ///
    /// `delegates = None` means the parent may create any label the policy
    /// allows. A label missing from the list is a `LabelNotPermitted` denial
    /// and is reported like any other.
    ///
    /// # Errors
    /// As [`create_sub_agent`](Self::create_sub_agent).
    pub fn create_sub_agent_with(
        &self,
        parent_id: &AgentId,
        label: &str,
        options: CreateOptions,
        delegates: Option<&[String]>,
    ) -> Result<AgentHandle> {
        match self.admit(parent_id, label, options, delegates) {
            Ok(handle) => {
                info!(
                    agent_id = %handle.id,
                    parent_id = %handle.parent_id,
                    depth = handle.depth,
                    label = %handle.label,
                    "Sub-agent created"
                );
                self.events.publish(OlympusEvent::AgentCreated {
                    agent_id: handle.id.clone(),
                    parent_id: handle.parent_id.clone(),
                    depth: handle.depth,
                    label: handle.label.clone(),
                });
                Ok(handle)
            }
            Err(Error::CreationDenied(reason)) => {
                warn!(parent_id = %parent_id, label, %reason, "Sub-agent creation denied");
                self.events.publish(OlympusEvent::CreationDenied {
                    parent_id: parent_id.clone(),
                    label: label.to_string(),
                    reason,
                });
                Err(Error::CreationDenied(reason))
            }
            Err(e) if e.is_defect() => {
                error!(parent_id = %parent_id, label, error = %e, "Hierarchy defect during creation");
                Err(e)
            }
            Err(e) => {
                warn!(parent_id = %parent_id, label, error = %e, "Sub-agent creation refused");
                Err(e)
            }
        }
    }

    /// Check-and-register under one lock acquisition
    fn admit(
        &self,
        parent_id: &AgentId,
        label: &str,
        options: CreateOptions,
        delegates: Option<&[String]>,
    ) -> Result<AgentHandle> {
        let mut state = self.lock();

        let parent_caps = if parent_id.is_root() {
            self.root_capabilities.clone()
        } else {
            match state.handles.get(parent_id) {
                Some(parent) if parent.can_delegate => parent.capabilities.clone(),
                Some(_) => return Err(Error::DelegationNotPermitted(parent_id.clone())),
                // Unknown or released: the policy or registry reports it
                None => BTreeSet::new(),
            }
        };

        if delegates.is_some_and(|list| !label_listed(list, label)) {
            return Err(Error::CreationDenied(Denial::LabelNotPermitted));
        }

        self.policy
            .can_create(&state.registry, parent_id, label)?
            .into_result()
            .map_err(Error::CreationDenied)?;

        let record = state
            .registry
            .register(AgentId::generate(label), parent_id.clone(), label)?;

        let configured = self
            .resolver
            .as_ref()
            .and_then(|r| r.capabilities_for(label))
            .unwrap_or_else(|| parent_caps.clone());
        let mut capabilities: BTreeSet<String> =
            configured.intersection(&parent_caps).cloned().collect();
        if let Some(requested) = &options.capabilities {
            capabilities.retain(|c| requested.contains(c));
        }

        state.handles.insert(
            record.id.clone(),
            HandleState {
                capabilities: capabilities.clone(),
                can_delegate: options.allow_agent_creation,
                callbacks: Vec::new(),
            },
        );

        Ok(AgentHandle {
            id: record.id,
            parent_id: record.parent_id,
            depth: record.depth,
            label: record.label,
            capabilities,
            can_delegate: options.allow_agent_creation,
        })
    }

    /// Register a cleanup callback to run when `id` is released.
    ///
    /// # Errors
    /// `NotFound` if `id` is not an active agent.
    pub fn on_release(&self, id: &AgentId, callback: CleanupCallback) -> Result<()> {
        let mut state = self.lock();
        match state.handles.get_mut(id) {
            Some(handle) => {
                handle.callbacks.push(callback);
                Ok(())
            }
            None => Err(Error::NotFound(id.clone())),
        }
    }

    /// Deregister an agent and run its cleanup callbacks.
    ///
    /// Idempotent: returns `false` if the agent was already inactive or absent.
    /// Callback failures are logged and never block deregistration.
    pub fn release(&self, id: &AgentId) -> bool {
        let (released, callbacks) = {
            let mut state = self.lock();
            let released = state.registry.deregister(id);
            let callbacks = state
                .handles
                .remove(id)
                .map(|h| h.callbacks)
                .unwrap_or_default();
            (released, callbacks)
        };

        if !released {
            debug!(agent_id = %id, "Release ignored: not active");
            return false;
        }

        let mut failures = 0;
        for callback in callbacks {
            if let Err(e) = callback(id) {
                failures += 1;
                warn!(agent_id = %id, error = %e, "Cleanup callback failed");
            }
        }

        info!(agent_id = %id, "Sub-agent released");
        self.events.publish(OlympusEvent::AgentReleased {
            agent_id: id.clone(),
            cleanup_failures: failures,
        });
        true
    }

    /// Release an agent's active descendants, deepest first, then the agent.
    ///
    /// Returns the number of agents released. Passing the root sentinel
    /// releases every agent.
    pub fn release_tree(&self, id: &AgentId) -> usize {
        let targets: Vec<AgentId> = {
            let state = self.lock();
            state
                .registry
                .descendants(id)
                .into_iter()
                .chain(std::iter::once(id.clone()))
                .filter(|d| state.registry.is_active(d))
                .collect()
        };
        targets.iter().filter(|t| self.release(t)).count()
    }

    /// Release active agents created more than `ttl` ago
    pub fn expire_older_than(&self, ttl: Duration) -> usize {
        let expired = self.lock().registry.active_older_than(ttl);
        let count = expired.iter().filter(|id| self.release(id)).count();
        if count > 0 {
            info!(count, ttl_secs = ttl.as_secs(), "Expired idle agents");
        }
        count
    }

    /// Purge inactive records older than `retention`.
    ///
    /// Also drops creation timestamps that can no longer affect the rate check.
    pub fn cleanup_inactive(&self, retention: Duration) -> usize {
        let mut state = self.lock();
        let purged = state.registry.purge_inactive_older_than(retention);
        state
            .registry
            .prune_creation_window(self.policy.config().rate_window());
        drop(state);

        if purged > 0 {
            info!(
                purged,
                retention_ms = u64::try_from(retention.as_millis()).unwrap_or(u64::MAX),
                "Purged inactive agents"
            );
        }
        purged
    }

    /// Number of active agents
    #[must_use]
    pub fn count_active(&self) -> usize {
        self.lock().registry.count_active()
    }

    /// Depth of `id` (0 for root)
    ///
    /// # Errors
    /// `NotFound` if no record exists.
    pub fn get_depth(&self, id: &AgentId) -> Result<u32> {
        self.lock().registry.get_depth(id)
    }

    /// Copy of the record for `id`
    #[must_use]
    pub fn record(&self, id: &AgentId) -> Option<AgentRecord> {
        self.lock().registry.get(id).cloned()
    }

    /// Ids of all children of `id`, regardless of status
    #[must_use]
    pub fn children(&self, id: &AgentId) -> BTreeSet<AgentId> {
        self.lock().registry.get_children(id)
    }

    /// Hierarchy projection and aggregate metrics
    #[must_use]
    pub fn inspect(&self) -> InspectionReport {
        let state = self.lock();
        let registry = &state.registry;

        InspectionReport {
            tree: HierarchyTree::build(registry),
            active_count: registry.count_active(),
            total_records: registry.len(),
            max_depth_observed: registry.max_depth_observed(),
            creations_per_parent: registry.creations_per_parent().clone(),
        }
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("policy", &self.policy)
            .field("active", &self.count_active())
            .finish()
    }
}
