//! Persona catalog: built-in presets plus any loaded from disk

use super::preset::by_domain_then_name;
use super::{Domain, PersonaPreset};
use crate::error::{Error, Result};
use crate::lifecycle::CapabilityResolver;
use std::collections::{BTreeMap, BTreeSet};

/// Name of the root persona
pub(crate) const ROOT_PERSONA: &str = "zeus";

/// Lookup of persona presets by name (case-insensitive)
#[derive(Debug, Clone, Default)]
pub struct PersonaCatalog {
    presets: BTreeMap<String, PersonaPreset>,
}

impl PersonaCatalog {
    /// Empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the built-in pantheon
    #[must_use]
    pub fn with_builtin() -> Self {
        Self::new().merge(Self::builtin_presets())
    }

    /// The built-in pantheon
    #[must_use]
    pub fn builtin_presets() -> Vec<PersonaPreset> {
        vec![
            PersonaPreset::new("Zeus", "King of the Gods", Domain::Orchestrator)
                .with_capabilities(&["plan", "design", "code", "test", "review", "research"])
                .with_delegates(&[
                    "orchestrator",
                    "architect",
                    "coder",
                    "tester",
                    "reviewer",
                    "researcher",
                ])
                .with_workflow(&["analyze task", "plan steps", "execute plan", "verify result"]),
            PersonaPreset::new("Athena", "Goddess of Wisdom", Domain::Architect)
                .with_capabilities(&["plan", "design", "review", "research"])
                .with_delegates(&["researcher", "reviewer"])
                .with_workflow(&[
                    "gather requirements",
                    "sketch architecture",
                    "record decisions",
                ]),
            PersonaPreset::new("Hephaestus", "Forge Master", Domain::Coder)
                .with_capabilities(&["code", "test"])
                .with_delegates(&["tester"])
                .with_workflow(&["read context", "implement change", "run checks"]),
            PersonaPreset::new("Apollo", "God of Light and Truth", Domain::Reviewer)
                .with_capabilities(&["review", "test"])
                .with_workflow(&["read diff", "check conventions", "report findings"]),
            PersonaPreset::new("Artemis", "Huntress", Domain::Tester)
                .with_capabilities(&["test"])
                .with_workflow(&["enumerate cases", "write tests", "run suite"]),
            PersonaPreset::new("Hermes", "Messenger of the Gods", Domain::Researcher)
                .with_capabilities(&["research"])
                .with_workflow(&["collect sources", "summarize findings"]),
        ]
    }

    /// Add or replace a preset; returns the replaced one
    pub fn insert(&mut self, preset: PersonaPreset) -> Option<PersonaPreset> {
        self.presets.insert(preset.persona.name.to_lowercase(), preset)
    }

    /// Add presets, replacing any with the same name
    #[must_use]
    pub fn merge(mut self, presets: impl IntoIterator<Item = PersonaPreset>) -> Self {
        for preset in presets {
            self.insert(preset);
        }
        self
    }

    /// Preset by name
    ///
    /// # Errors
    /// `UnknownPersona` if no preset has that name.
    pub fn get(&self, name: &str) -> Result<&PersonaPreset> {
        self.presets
            .get(&name.to_lowercase())
            .ok_or_else(|| Error::UnknownPersona(name.to_string()))
    }

    /// Preset for an agent label: a persona name first, then the first
    /// persona (by name) whose domain carries that label
    #[must_use]
    pub fn for_label(&self, label: &str) -> Option<&PersonaPreset> {
        self.presets.get(&label.to_lowercase()).or_else(|| {
            let domain = Domain::from_label(label)?;
            self.presets.values().find(|p| p.persona.domain == domain)
        })
    }

    /// The root persona (Zeus, or else the first orchestrator)
    ///
    /// # Errors
    /// `UnknownPersona` if the catalog holds no orchestrator.
    pub fn root(&self) -> Result<&PersonaPreset> {
        self.get(ROOT_PERSONA).or_else(|_| {
            self.for_label(Domain::Orchestrator.label())
                .ok_or_else(|| Error::UnknownPersona(ROOT_PERSONA.to_string()))
        })
    }

    /// Presets ordered by domain, then name
    #[must_use]
    pub fn presets(&self) -> Vec<&PersonaPreset> {
        let mut presets: Vec<_> = self.presets.values().collect();
        presets.sort_by(|a, b| by_domain_then_name(a, b));
        presets
    }

    /// Number of presets
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl CapabilityResolver for PersonaCatalog {
    fn capabilities_for(&self, label: &str) -> Option<BTreeSet<String>> {
        self.for_label(label).map(PersonaPreset::capability_set)
    }
}

#[cfg(test)]
mod tests;
