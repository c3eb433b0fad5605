//! Persona - the externally visible actor
//!
//! A persona pairs a preset with an identity in the hierarchy: the root
//! persona (Zeus) is the `root` sentinel; every delegate wraps the handle
//! returned by the lifecycle manager. Both expose the same two operations.

use crate::config::OrchestrationConfig;
use crate::error::{Error, Result};
use crate::hierarchy::AgentId;
use crate::lifecycle::{AgentHandle, CreateOptions, LifecycleManager};
use crate::pantheon::{PersonaCatalog, PersonaPreset};
use crate::router::{
    DeterministicWorkflow, ExecutionBackend, OrchestrationRouter, RouterMetricsSnapshot,
    TaskOutcome,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// An orchestrating actor, root or delegate
#[derive(Debug)]
pub struct Persona {
    id: AgentId,
    handle: Option<AgentHandle>,
    preset: PersonaPreset,
    workflow: DeterministicWorkflow,
    lifecycle: Arc<LifecycleManager>,
    router: OrchestrationRouter,
}

impl Persona {
    /// The root persona, identified by the root sentinel
    #[must_use]
    pub fn root(
        preset: PersonaPreset,
        lifecycle: Arc<LifecycleManager>,
        backend: Arc<dyn ExecutionBackend>,
        config: &OrchestrationConfig,
    ) -> Self {
        Self::build(AgentId::root(), None, preset, lifecycle, backend, config)
    }

    /// A delegate persona acting through `handle`
    #[must_use]
    pub fn delegate(
        handle: AgentHandle,
        preset: PersonaPreset,
        lifecycle: Arc<LifecycleManager>,
        backend: Arc<dyn ExecutionBackend>,
        config: &OrchestrationConfig,
    ) -> Self {
        let id = handle.id.clone();
        Self::build(id, Some(handle), preset, lifecycle, backend, config)
    }

    fn build(
        id: AgentId,
        handle: Option<AgentHandle>,
        preset: PersonaPreset,
        lifecycle: Arc<LifecycleManager>,
        backend: Arc<dyn ExecutionBackend>,
        config: &OrchestrationConfig,
    ) -> Self {
        let router = OrchestrationRouter::new(config, lifecycle.clone(), backend);
        Self {
            id,
            handle,
            workflow: preset.to_workflow(),
            preset,
            lifecycle,
            router,
        }
    }

    /// Agent id (`root` for the root persona)
    #[must_use]
    pub fn id(&self) -> &AgentId {
        &self.id
    }

    /// The preset this persona runs
    #[must_use]
    pub fn preset(&self) -> &PersonaPreset {
        &self.preset
    }

    /// Handle for a delegate, `None` for root
    #[must_use]
    pub fn handle(&self) -> Option<&AgentHandle> {
        self.handle.as_ref()
    }

    /// Depth in the hierarchy
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.handle.as_ref().map_or(0, |h| h.depth)
    }

    /// Router counters for tasks this persona received
    #[must_use]
    pub fn metrics(&self) -> RouterMetricsSnapshot {
        self.router.metrics()
    }

    /// Route and execute a task
    ///
    /// # Errors
    /// See [`OrchestrationRouter::route`].
    pub async fn orchestrate(&self, task: &str) -> Result<TaskOutcome> {
        debug!(persona = %self.preset.name(), agent_id = %self.id, "Orchestrating task");
        self.router.route(&self.id, &self.workflow, task).await
    }

    /// Create a sub-agent of this persona.
    ///
    /// A preset that lists delegates refuses any other label.
    ///
    /// # Errors
    /// - `CreationDenied(LabelNotPermitted)` for a label off the preset's list
    /// - Any error from [`LifecycleManager::create_sub_agent`]
    pub fn create_sub_agent(&self, label: &str, options: CreateOptions) -> Result<AgentHandle> {
        let delegates = self
            .preset
            .delegates()
            .then_some(self.preset.delegation.delegates.as_slice());
        self.lifecycle
            .create_sub_agent_with(&self.id, label, options, delegates)
    }
}

/// Executes a delegated task by letting a delegate persona orchestrate it.
///
/// The delegate routes the task again, so nesting continues until the
/// safety policy denies a creation and the deterministic path takes over.
#[derive(Clone)]
pub struct NestedBackend {
    catalog: Arc<PersonaCatalog>,
    lifecycle: Arc<LifecycleManager>,
    config: OrchestrationConfig,
}

impl NestedBackend {
    /// Create a nested backend
    #[must_use]
    pub fn new(
        catalog: Arc<PersonaCatalog>,
        lifecycle: Arc<LifecycleManager>,
        config: OrchestrationConfig,
    ) -> Self {
        Self {
            catalog,
            lifecycle,
            config,
        }
    }
}

#[async_trait]
impl ExecutionBackend for NestedBackend {
    async fn execute(&self, agent: &AgentHandle, task: &str) -> Result<String> {
        let preset = self
            .catalog
            .for_label(&agent.label)
            .cloned()
            .ok_or_else(|| Error::UnknownPersona(agent.label.clone()))?;

        let persona = Persona::delegate(
            agent.clone(),
            preset,
            self.lifecycle.clone(),
            Arc::new(self.clone()),
            &self.config,
        );
        let outcome = persona.orchestrate(task).await?;
        debug!(
            agent_id = %agent.id,
            depth = agent.depth,
            path = ?outcome.path,
            "Nested delegate finished"
        );
        Ok(outcome.output)
    }
}

impl std::fmt::Debug for NestedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedBackend")
            .field("personas", &self.catalog.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
