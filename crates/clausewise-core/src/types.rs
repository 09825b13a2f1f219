//! Core types for ClauseWise

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clause type reported for records produced by a failed analysis
pub const ERROR_CLAUSE_TYPE: &str = "Error";

/// Clause type used when the model did not report one
pub const UNKNOWN_CLAUSE_TYPE: &str = "Unknown";

/// Severity of a clause, ranked `None < Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No risk keyword matched
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lowercase name as written to reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Combine the running level with a newly matched tier.
    ///
    /// The first match is adopted as-is; afterwards only `High` may replace
    /// the current level.
    pub fn escalate(self, matched: RiskLevel) -> RiskLevel {
        if self == RiskLevel::None || matched == RiskLevel::High {
            matched
        } else {
            self
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown risk level: {}", other)),
        }
    }
}

/// A clause-like passage located in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateClause {
    /// Category name from the pattern registry
    pub clause_type: String,

    /// Character offset where the raw match starts
    pub start: usize,

    /// Character offset one past the raw match
    pub end: usize,

    /// Sentence-level text around the match
    pub text: String,
}

/// Structured analysis of a single clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseAnalysisResult {
    /// Clause type as reported by the model, or `Error`/`Unknown`
    pub clause_type: String,

    /// The clause text that was analyzed
    pub original_text: String,

    /// Plain-English summary
    pub summary: String,

    /// Keyword-based risk level
    pub risk_level: RiskLevel,

    /// Human-readable reasons behind the risk level, in match order
    pub risk_reasons: Vec<String>,
}

impl ClauseAnalysisResult {
    /// Sentinel record for a clause whose analysis failed
    pub fn error(original_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            clause_type: ERROR_CLAUSE_TYPE.to_string(),
            original_text: original_text.into(),
            summary: message.into(),
            risk_level: RiskLevel::None,
            risk_reasons: Vec::new(),
        }
    }

    /// Whether this is a sentinel error record
    pub fn is_error(&self) -> bool {
        self.clause_type == ERROR_CLAUSE_TYPE
    }

    /// Risk reasons joined the way reports store them
    pub fn joined_reasons(&self) -> String {
        self.risk_reasons.join("; ")
    }
}

/// One row per analyzed clause, in detection order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisTable {
    rows: Vec<ClauseAnalysisResult>,
}

impl AnalysisTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row
    pub fn push(&mut self, row: ClauseAnalysisResult) {
        self.rows.push(row);
    }

    /// All rows in order
    pub fn rows(&self) -> &[ClauseAnalysisResult] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows
    pub fn iter(&self) -> std::slice::Iter<'_, ClauseAnalysisResult> {
        self.rows.iter()
    }
}

impl From<Vec<ClauseAnalysisResult>> for AnalysisTable {
    fn from(rows: Vec<ClauseAnalysisResult>) -> Self {
        Self { rows }
    }
}

impl FromIterator<ClauseAnalysisResult> for AnalysisTable {
    fn from_iter<I: IntoIterator<Item = ClauseAnalysisResult>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AnalysisTable {
    type Item = &'a ClauseAnalysisResult;
    type IntoIter = std::slice::Iter<'a, ClauseAnalysisResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
