//! Persona Preset Definitions
//!
//! Persona structures loaded from TOML files

use super::Domain;
use crate::policy::label_listed;
use crate::router::DeterministicWorkflow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Persona Basic Information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaInfo {
    /// Name (e.g., "Hephaestus")
    pub name: String,
    /// Title (e.g., "Forge Master")
    pub title: String,
    /// Domain (role)
    pub domain: Domain,
    /// Description (optional)
    #[serde(default)]
    pub description: Option<String>,
}

/// Capabilities the persona holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaCapabilities {
    /// Granted capability names
    #[serde(default)]
    pub granted: Vec<String>,
}

/// Labels the persona may create sub-agents for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDelegation {
    /// Allowed delegate labels; empty means this persona never delegates
    #[serde(default)]
    pub delegates: Vec<String>,
}

/// Local workflow run on the deterministic path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaWorkflow {
    /// Ordered step names
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Persona Preset (loaded from TOML)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaPreset {
    /// Basic information
    pub persona: PersonaInfo,
    /// Capabilities
    #[serde(default)]
    pub capabilities: PersonaCapabilities,
    /// Delegation allow-list
    #[serde(default)]
    pub delegation: PersonaDelegation,
    /// Deterministic workflow
    #[serde(default)]
    pub workflow: PersonaWorkflow,
}

impl PersonaPreset {
    /// Build a preset in code
    #[must_use]
    pub fn new(name: &str, title: &str, domain: Domain) -> Self {
        Self {
            persona: PersonaInfo {
                name: name.to_string(),
                title: title.to_string(),
                domain,
                description: None,
            },
            capabilities: PersonaCapabilities::default(),
            delegation: PersonaDelegation::default(),
            workflow: PersonaWorkflow::default(),
        }
    }

    /// Set granted capabilities
    #[must_use]
    pub fn with_capabilities(mut self, caps: &[&str]) -> Self {
        self.capabilities.granted = caps.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Set the delegation allow-list
    #[must_use]
    pub fn with_delegates(mut self, labels: &[&str]) -> Self {
        self.delegation.delegates = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Set workflow steps
    #[must_use]
    pub fn with_workflow(mut self, steps: &[&str]) -> Self {
        self.workflow.steps = steps.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Persona name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.persona.name
    }

    /// Agent label for this persona's domain
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.persona.domain.label()
    }

    /// Capabilities as a set
    #[must_use]
    pub fn capability_set(&self) -> BTreeSet<String> {
        self.capabilities.granted.iter().cloned().collect()
    }

    /// Whether this persona lists any delegates
    #[must_use]
    pub fn delegates(&self) -> bool {
        !self.delegation.delegates.is_empty()
    }

    /// Whether `label` is on the delegation allow-list
    #[must_use]
    pub fn may_delegate_to(&self, label: &str) -> bool {
        label_listed(&self.delegation.delegates, label)
    }

    /// The persona's deterministic workflow
    #[must_use]
    pub fn to_workflow(&self) -> DeterministicWorkflow {
        DeterministicWorkflow::new(&self.persona.name, self.workflow.steps.clone())
    }

    /// One-line summary for listings
    #[must_use]
    pub fn summary(&self) -> String {
        let delegates = if self.delegates() {
            self.delegation.delegates.join(", ")
        } else {
            "-".to_string()
        };
        format!(
            "{:<12} {:<26} {:<13} delegates: {}",
            self.persona.name,
            self.persona.title,
            self.persona.domain.as_str(),
            delegates
        )
    }
}

/// Listing order: orchestrators first, then by name
pub(crate) fn by_domain_then_name(a: &PersonaPreset, b: &PersonaPreset) -> Ordering {
    a.persona
        .domain
        .cmp(&b.persona.domain)
        .then_with(|| a.persona.name.cmp(&b.persona.name))
}
