//! Complexity Analyzer - heuristic task scoring for routing
//!
//! Maps free text to three bounded sub-scores and a combined `overall` in
//! `0..=10`. The result only selects an execution path; it never affects
//! correctness. Scoring is pure: same text and weights, same score.

use crate::config::{ComplexityWeights, OrchestrationConfig};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Upper bound of every score
const MAX_SCORE: u8 = 10;

/// Uncertainty of a non-empty task with no hedging or concrete language
const BASE_UNCERTAINTY: i32 = 3;

/// Points per systems-oriented term
const TECHNICAL_STEP: u32 = 2;

// ── Compiled patterns ───────────────────────────────────────────

fn compile_terms(terms: &[&str]) -> Vec<Regex> {
    terms
        .iter()
        .map(|t| {
            Regex::new(&format!(r"(?i)\b(?:{})\b", t)).expect("keyword patterns are constants")
        })
        .collect()
}

/// Systems-oriented vocabulary
static TECHNICAL_TERMS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_terms(&[
        "design",
        "scalable",
        "scalability",
        "microservices?",
        "real-?time",
        "security",
        "compliance",
        "architecture",
        "distributed",
        "pipelines?",
        "integrations?",
        "infrastructure",
        "performance",
        "concurren(?:t|cy)",
        "orchestration",
        "kubernetes",
        "databases?",
        "apis?",
        "migrations?",
        "encryption",
        "authentication",
        "clusters?",
        "streaming",
    ])
});

/// Hedging language raises uncertainty
static HEDGE_TERMS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_terms(&[
        "maybe",
        "possibly",
        "perhaps",
        "explore",
        "could",
        "might",
        "some kind of",
        "not sure",
        "figure out",
        "somehow",
        "investigate",
        "unclear",
        "ideas?",
    ])
});

/// Concrete language lowers uncertainty
static CONCRETE_TERMS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_terms(&[
        "implement",
        "create",
        "exact",
        "exactly",
        "specific",
        "write",
        "fix",
        "add",
        "rename",
        "update",
    ])
});

/// Recognized domains, one pattern per domain
static DOMAINS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("frontend", r"frontend|front-end|ui|ux|react|vue|css"),
        ("backend", r"backend|back-end|server|apis?|microservices?"),
        ("ml", r"ml|machine learning|ai|neural|llm"),
        ("blockchain", r"blockchain|smart contracts?|web3|crypto"),
        ("security", r"security|compliance|auth|authentication|encryption"),
        ("data", r"data|databases?|analytics|etl|sql"),
        ("mobile", r"mobile|ios|android"),
        ("devops", r"devops|kubernetes|docker|deploy(?:ment)?|infrastructure"),
        ("realtime", r"real-?time|streaming|websockets?"),
    ]
    .into_iter()
    .map(|(name, alts)| {
        let re = Regex::new(&format!(r"(?i)\b(?:{})\b", alts))
            .expect("domain patterns are constants");
        (name, re)
    })
    .collect()
});

fn matches(patterns: &[Regex], text: &str) -> u32 {
    patterns.iter().filter(|re| re.is_match(text)).count() as u32
}

// ── Score ───────────────────────────────────────────────────────

/// Result of analyzing one task description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplexityScore {
    /// Systems-oriented signal (0-10)
    pub technical: u8,
    /// Hedging minus concrete language (0-10)
    pub uncertainty: u8,
    /// Distinct recognized domains, capped
    pub domain_count: u8,
    /// Weighted combination (0-10)
    pub overall: u8,
    /// Names of the recognized domains
    pub domains: Vec<&'static str>,
}

/// Task complexity scorer
#[derive(Debug, Clone)]
pub struct ComplexityAnalyzer {
    weights: ComplexityWeights,
    domain_cap: u8,
}

impl Default for ComplexityAnalyzer {
    fn default() -> Self {
        Self::from_config(&OrchestrationConfig::default())
    }
}

impl ComplexityAnalyzer {
    /// Create an analyzer with explicit weights
    #[must_use]
    pub fn new(weights: ComplexityWeights, domain_cap: u8) -> Self {
        Self {
            weights,
            domain_cap,
        }
    }

    /// Create an analyzer from routing configuration
    #[must_use]
    pub fn from_config(config: &OrchestrationConfig) -> Self {
        Self::new(config.weights, config.domain_cap)
    }

    /// Score a task description.
    ///
    /// Blank input yields the minimum score.
    #[must_use]
    pub fn analyze(&self, task: &str) -> ComplexityScore {
        let text = task.trim();
        if text.is_empty() {
            return ComplexityScore::default();
        }

        let technical = (matches(&TECHNICAL_TERMS, text) * TECHNICAL_STEP).min(MAX_SCORE as u32) as u8;

        let hedges = matches(&HEDGE_TERMS, text) as i32;
        let concrete = matches(&CONCRETE_TERMS, text) as i32;
        let uncertainty = (BASE_UNCERTAINTY + 2 * hedges - concrete).clamp(0, MAX_SCORE as i32) as u8;

        let mut domains: Vec<&'static str> = DOMAINS
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(name, _)| *name)
            .collect();
        domains.truncate(self.domain_cap as usize);
        let domain_count = domains.len() as u8;

        ComplexityScore {
            technical,
            uncertainty,
            domain_count,
            overall: self.combine(technical, uncertainty, domain_count),
            domains,
        }
    }

    /// Combine sub-scores into `overall`.
    ///
    /// Non-decreasing in every argument as long as the weights are
    /// non-negative, which `OlympusConfig::validate` enforces.
    #[must_use]
    pub fn combine(&self, technical: u8, uncertainty: u8, domain_count: u8) -> u8 {
        let w = &self.weights;
        if w.divisor <= 0.0 {
            return 0;
        }
        let raw = (f32::from(technical) * w.technical
            + f32::from(uncertainty) * w.uncertainty
            + f32::from(domain_count) * w.domain)
            / w.divisor;
        raw.round().clamp(0.0, f32::from(MAX_SCORE)) as u8
    }
}
