use crate::error::{Error, Result};
use crate::hierarchy::AgentId;

/// A persona's fixed local workflow: no agent is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicWorkflow {
    name: String,
    steps: Vec<String>,
}

impl DeterministicWorkflow {
    /// Create a workflow from ordered step names
    #[must_use]
    pub fn new(name: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Workflow name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered step names
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Walk the steps in order for `task`
    ///
    /// # Errors
    /// `Execution` if the workflow has no steps.
    pub fn run(&self, caller: &AgentId, task: &str) -> Result<String> {
        if self.steps.is_empty() {
            return Err(Error::Execution(format!(
                "workflow '{}' has no steps",
                self.name
            )));
        }

        let total = self.steps.len();
        let mut out = format!("[{}@{}] {}\n", self.name, caller, task.trim());
        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("  {}/{} {}\n", i + 1, total, step));
        }
        Ok(out)
    }
}
