//! Orchestration Router
//!
//! Per task: score it, then either run the caller's local workflow
//! (`overall <= threshold`) or hand it to a freshly created delegate.
//! Delegation is an optimization. A denied creation or a failed backend
//! call falls back to the local workflow, and the delegate is always
//! released once execution ends.

mod backend;
mod metrics;
mod workflow;


pub use backend::ExecutionBackend;
pub use metrics::RouterMetricsSnapshot;
pub use workflow::DeterministicWorkflow;

use crate::complexity::{ComplexityAnalyzer, ComplexityScore};
use crate::config::OrchestrationConfig;
use crate::error::{Error, Result};
use crate::event_bus::OlympusEvent;
use crate::hierarchy::AgentId;
use crate::lifecycle::{CreateOptions, LifecycleManager};
use metrics::RouterMetrics;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Which path produced a task's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPath {
    /// Local workflow, chosen by score
    Deterministic,
    /// A delegate executed the task
    Delegated,
    /// Local workflow after delegation failed
    Fallback,
}

/// Result of routing one task
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    /// Path that produced the output
    pub path: ExecutionPath,
    /// Complexity score used for the decision
    pub score: ComplexityScore,
    /// Task output
    pub output: String,
    /// Delegate that executed the task, if one was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate_id: Option<AgentId>,
    /// Why delegation was abandoned, on fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_cause: Option<String>,
}

/// Releases the delegate when dropped, so cancellation of the routing
/// future cannot leak an active agent
struct DelegateGuard<'a> {
    lifecycle: &'a LifecycleManager,
    id: AgentId,
}

impl Drop for DelegateGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.release(&self.id);
    }
}

/// Deterministic vs delegated execution
pub struct OrchestrationRouter {
    analyzer: ComplexityAnalyzer,
    threshold: u8,
    delegate_label: String,
    lifecycle: Arc<LifecycleManager>,
    backend: Arc<dyn ExecutionBackend>,
    metrics: RouterMetrics,
}

impl OrchestrationRouter {
    /// Create a router
    #[must_use]
    pub fn new(
        config: &OrchestrationConfig,
        lifecycle: Arc<LifecycleManager>,
        backend: Arc<dyn ExecutionBackend>,
    ) -> Self {
        Self {
            analyzer: ComplexityAnalyzer::from_config(config),
            threshold: config.threshold,
            delegate_label: config.delegate_label.clone(),
            lifecycle,
            backend,
            metrics: RouterMetrics::default(),
        }
    }

    /// The scorer used for routing
    #[must_use]
    pub fn analyzer(&self) -> &ComplexityAnalyzer {
        &self.analyzer
    }

    /// Current counters
    #[must_use]
    pub fn metrics(&self) -> RouterMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Route and execute `task` for `caller`.
    ///
    /// Never fails because of a creation denial. Fails only if the local
    /// workflow fails; when that happens after a backend failure, the
    /// backend's error is returned.
    ///
    /// # Errors
    /// - Workflow or backend `Execution` errors as described above
    /// - Defect-class errors from the lifecycle manager
    pub async fn route(
        &self,
        caller: &AgentId,
        workflow: &DeterministicWorkflow,
        task: &str,
    ) -> Result<TaskOutcome> {
        let score = self.analyzer.analyze(task);

        if score.overall <= self.threshold {
            self.metrics.deterministic.inc();
            info!(caller = %caller, score = score.overall, "Routing to deterministic path");
            self.lifecycle.events().publish(OlympusEvent::Deterministic {
                caller: caller.clone(),
                score: score.overall,
            });
            let output = workflow.run(caller, task)?;
            return Ok(TaskOutcome {
                path: ExecutionPath::Deterministic,
                score,
                output,
                delegate_id: None,
                fallback_cause: None,
            });
        }

        self.metrics.delegated.inc();
        info!(caller = %caller, score = score.overall, "Routing to delegated path");

        let handle = match self.lifecycle.create_sub_agent(
            caller,
            &self.delegate_label,
            CreateOptions::delegating(),
        ) {
            Ok(handle) => handle,
            Err(e) if e.is_recoverable() => {
                return self.fallback(caller, workflow, task, score, e.to_string(), None);
            }
            Err(e) => return Err(e),
        };
        self.metrics.sub_agents_created.inc();
        self.lifecycle.events().publish(OlympusEvent::Delegated {
            caller: caller.clone(),
            delegate_id: handle.id.clone(),
            score: score.overall,
        });

        let result = {
            let _guard = DelegateGuard {
                lifecycle: &self.lifecycle,
                id: handle.id.clone(),
            };
            self.backend.execute(&handle, task).await
        };

        match result {
            Ok(output) => Ok(TaskOutcome {
                path: ExecutionPath::Delegated,
                score,
                output,
                delegate_id: Some(handle.id),
                fallback_cause: None,
            }),
            Err(e) => {
                warn!(delegate_id = %handle.id, error = %e, "Delegate execution failed");
                let cause = e.to_string();
                self.fallback(caller, workflow, task, score, cause, Some(e))
                    .map(|mut outcome| {
                        outcome.delegate_id = Some(handle.id);
                        outcome
                    })
            }
        }
    }

    fn fallback(
        &self,
        caller: &AgentId,
        workflow: &DeterministicWorkflow,
        task: &str,
        score: ComplexityScore,
        cause: String,
        original: Option<Error>,
    ) -> Result<TaskOutcome> {
        self.metrics.fallbacks.inc();
        warn!(caller = %caller, cause = %cause, "Falling back to deterministic path");
        self.lifecycle.events().publish(OlympusEvent::Fallback {
            caller: caller.clone(),
            cause: cause.clone(),
        });

        match workflow.run(caller, task) {
            Ok(output) => Ok(TaskOutcome {
                path: ExecutionPath::Fallback,
                score,
                output,
                delegate_id: None,
                fallback_cause: Some(cause),
            }),
            Err(fallback_err) => Err(original.unwrap_or(fallback_err)),
        }
    }
}

impl std::fmt::Debug for OrchestrationRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestrationRouter")
            .field("threshold", &self.threshold)
            .field("delegate_label", &self.delegate_label)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}
