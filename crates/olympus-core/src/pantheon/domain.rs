//! Persona Domain (Role Classification)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persona Domain - the closed set of persona variants
///
/// - Orchestrator: plans and delegates (Zeus)
/// - Architect: system design (Athena)
/// - Coder: implementation (Hephaestus)
/// - Tester: verification (Artemis)
/// - Reviewer: review (Apollo)
/// - Researcher: research (Hermes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Domain {
    /// Plans and delegates
    Orchestrator,
    /// System design
    Architect,
    /// Implementation
    Coder,
    /// Verification
    Tester,
    /// Code review
    Reviewer,
    /// Research
    Researcher,
}

impl Domain {
    /// Every domain, in declaration order
    pub const ALL: [Domain; 6] = [
        Self::Orchestrator,
        Self::Architect,
        Self::Coder,
        Self::Tester,
        Self::Reviewer,
        Self::Researcher,
    ];

    /// Return string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Orchestrator => "ORCHESTRATOR",
            Self::Architect => "ARCHITECT",
            Self::Coder => "CODER",
            Self::Tester => "TESTER",
            Self::Reviewer => "REVIEWER",
            Self::Researcher => "RESEARCHER",
        }
    }

    /// Agent label used when a persona of this domain is created
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Architect => "architect",
            Self::Coder => "coder",
            Self::Tester => "tester",
            Self::Reviewer => "reviewer",
            Self::Researcher => "researcher",
        }
    }

    /// Parse an agent label (case-insensitive)
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::Coder
    }
}
