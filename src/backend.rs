//! Simulated execution backend
//!
//! Stands in for real task execution so the CLI can exercise the delegated
//! path end to end.

use async_trait::async_trait;
use olympus_core::{AgentHandle, Error, ExecutionBackend, Result};
use std::time::Duration;
use tracing::debug;

/// Backend that answers after a fixed latency, or always fails
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    latency: Duration,
    fail: bool,
}

impl SimulatedBackend {
    /// Create a backend
    pub fn new(latency: Duration, fail: bool) -> Self {
        Self { latency, fail }
    }
}

#[async_trait]
impl ExecutionBackend for SimulatedBackend {
    async fn execute(&self, agent: &AgentHandle, task: &str) -> Result<String> {
        debug!(
            agent_id = %agent.id,
            latency_ms = u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX),
            "Simulating execution"
        );
        tokio::time::sleep(self.latency).await;

        if self.fail {
            return Err(Error::Execution(format!(
                "simulated backend failure for {}",
                agent.id
            )));
        }

        let capabilities = if agent.capabilities.is_empty() {
            "-".to_string()
        } else {
            agent
                .capabilities
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        Ok(format!(
            "[{} {} depth={}] handled: {}\n  capabilities: {}\n",
            agent.label,
            agent.id,
            agent.depth,
            task.trim(),
            capabilities
        ))
    }
}
