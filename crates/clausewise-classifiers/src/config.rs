//! Configuration for clause patterns and risk keywords

use clausewise_core::{Error, Result, RiskLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Detection and scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Clause detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Risk keyword tiers
    #[serde(default)]
    pub risk: RiskKeywordTable,
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| Error::config(format!("Failed to parse {:?}: {}", path, e)))
    }
}

/// Clause detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Characters of context taken on each side of a match
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Ordered pattern registry; replaces the built-in one when present
    #[serde(default = "default_patterns")]
    pub patterns: Vec<ClausePatternSpec>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            patterns: default_patterns(),
        }
    }
}

/// A named clause category and the expression that finds it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClausePatternSpec {
    /// Category name, e.g. `termination`
    pub name: String,

    /// Regular expression, matched case-insensitively
    pub pattern: String,
}

impl ClausePatternSpec {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Literal risk phrases in three severity tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskKeywordTable {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

impl RiskKeywordTable {
    /// Tiers in evaluation order: high, medium, low
    pub fn tiers(&self) -> [(RiskLevel, &[String]); 3] {
        [
            (RiskLevel::High, self.high.as_slice()),
            (RiskLevel::Medium, self.medium.as_slice()),
            (RiskLevel::Low, self.low.as_slice()),
        ]
    }
}

impl Default for RiskKeywordTable {
    fn default() -> Self {
        Self {
            high: strings(&[
                "irrevocable",
                "uncapped",
                "joint and several",
                "exclusive",
                "perpetual",
                "penalty",
                "compensation",
                "termination",
                "₹",
            ]),
            medium: strings(&[
                "sole discretion",
                "without cause",
                "indemnify",
                "liquidated damages",
                "discretion",
                "solely responsible",
                "non-negotiable",
                "non-refundable",
            ]),
            low: strings(&["reasonable efforts", "good faith", "mutual", "attempt", "may be"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_context_window() -> usize {
    250
}

/// Built-in clause category registry
pub fn default_patterns() -> Vec<ClausePatternSpec> {
    [
        ("confidentiality", r"(confidential|non[\s-]?disclosure|nda)"),
        ("termination", r"terminat"),
        ("indemnification", r"indemnif"),
        ("liability", r"(liability|limitation of liability)"),
        ("governing_law", r"(governing law|jurisdiction|venue)"),
        ("ip_ownership", r"(intellectual property|ip|ownership|patent|copyright)"),
        ("warranties", r"warrant(y|ies)"),
        ("assignment", r"assign"),
        ("notice", r"notice"),
        ("severability", r"severab"),
        ("force_majeure", r"force majeure"),
        ("arbitration", r"arbitrat"),
        ("auto_renewal", r"(auto[\s-]?renew|evergreen)"),
    ]
    .into_iter()
    .map(|(name, pattern)| ClausePatternSpec::new(name, pattern))
    .collect()
}
