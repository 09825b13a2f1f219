//! Keyword-based clause risk scoring

use crate::config::RiskKeywordTable;
use clausewise_core::{Error, Result, RiskLevel};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Outcome of scoring one clause
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Highest-priority tier that matched
    pub level: RiskLevel,

    /// One `Contains '<keyword>'` entry per matched keyword, tier order
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
struct Keyword {
    phrase: String,
    regex: Regex,
}

/// Scores clauses by whole-word keyword presence
#[derive(Debug, Clone)]
pub struct RiskScorer {
    tiers: Vec<(RiskLevel, Vec<Keyword>)>,
}

impl RiskScorer {
    /// Compile a scorer for the given keyword table
    pub fn new(table: &RiskKeywordTable) -> Result<Self> {
        let tiers = table
            .tiers()
            .into_iter()
            .map(|(level, phrases)| {
                let keywords = phrases
                    .iter()
                    .filter(|p| !p.trim().is_empty())
                    .map(|phrase| compile_keyword(phrase))
                    .collect::<Result<Vec<_>>>()?;
                Ok((level, keywords))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tiers })
    }

    /// Score a clause.
    ///
    /// All tiers are evaluated so every matched keyword is reported; a high
    /// match always wins over earlier medium/low matches.
    pub fn score(&self, clause_text: &str) -> RiskAssessment {
        let mut assessment = RiskAssessment::default();

        for (level, keywords) in &self.tiers {
            for keyword in keywords {
                if keyword.regex.is_match(clause_text) {
                    assessment.reasons.push(format!("Contains '{}'", keyword.phrase));
                    assessment.level = assessment.level.escalate(*level);
                }
            }
        }

        assessment
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(&RiskKeywordTable::default()).expect("Failed to create default risk scorer")
    }
}

fn compile_keyword(phrase: &str) -> Result<Keyword> {
    let regex = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(phrase)))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::config(format!("Invalid risk keyword '{}': {}", phrase, e)))?;

    Ok(Keyword {
        phrase: phrase.to_string(),
        regex,
    })
}
