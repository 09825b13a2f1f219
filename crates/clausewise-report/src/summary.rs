//! Risk counts and row filtering for saved analyses

use clausewise_core::{AnalysisTable, ClauseAnalysisResult, RiskLevel};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of clauses at each risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub none: usize,
}

impl RiskSummary {
    /// Count the rows of `table` by risk level
    pub fn from_table(table: &AnalysisTable) -> Self {
        table.iter().fold(Self::default(), |mut summary, row| {
            summary.total += 1;
            match row.risk_level {
                RiskLevel::High => summary.high += 1,
                RiskLevel::Medium => summary.medium += 1,
                RiskLevel::Low => summary.low += 1,
                RiskLevel::None => summary.none += 1,
            }
            summary
        })
    }

    /// Count for a single level
    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
            RiskLevel::None => self.none,
        }
    }
}

impl fmt::Display for RiskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | High: {} | Medium: {} | Low: {} | None: {}",
            self.total, self.high, self.medium, self.low, self.none
        )
    }
}

/// Row selection by risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RiskFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
    None,
}

impl RiskFilter {
    /// The level this filter keeps; `None` for `All`
    pub fn level(&self) -> Option<RiskLevel> {
        match self {
            Self::All => Option::None,
            Self::High => Some(RiskLevel::High),
            Self::Medium => Some(RiskLevel::Medium),
            Self::Low => Some(RiskLevel::Low),
            Self::None => Some(RiskLevel::None),
        }
    }

    pub fn matches(&self, row: &ClauseAnalysisResult) -> bool {
        self.level().map_or(true, |level| row.risk_level == level)
    }

    /// Matching rows of `table`, in table order
    pub fn apply<'a>(&self, table: &'a AnalysisTable) -> Vec<&'a ClauseAnalysisResult> {
        table.iter().filter(|row| self.matches(row)).collect()
    }
}

impl FromStr for RiskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "none" => Ok(Self::None),
            other => Err(format!("unknown risk filter: '{}'", other)),
        }
    }
}

impl fmt::Display for RiskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level() {
            Some(level) => write!(f, "{}", level),
            Option::None => f.write_str("all"),
        }
    }
}

/// Cut `text` to `width` characters, marking the cut with `...`
pub fn truncate_text(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}
