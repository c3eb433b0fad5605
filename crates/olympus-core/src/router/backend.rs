use crate::error::Result;
use crate::lifecycle::AgentHandle;
use async_trait::async_trait;

/// Executes a task on behalf of a delegate.
///
/// Treated as opaque: potentially slow, potentially failing. Timeouts and
/// cancellation of in-flight work belong to the implementation.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Run `task` as `agent` and return its output
    async fn execute(&self, agent: &AgentHandle, task: &str) -> Result<String>;
}
