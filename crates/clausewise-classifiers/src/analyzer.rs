//! LLM-backed clause analysis
//!
//! One model call per clause, gated by the shared rate limiter. The model
//! supplies the clause type and summary; risk always comes from the keyword
//! scorer so two runs over the same text agree on severity.

use crate::response::{parse_response, ParsedResponse};
use crate::risk::RiskScorer;
use clausewise_core::{
    CandidateClause, ClauseAnalysisResult, GatedModel, LanguageModel, RateLimiter, Result,
    RetryPolicy, UNKNOWN_CLAUSE_TYPE,
};
use clausewise_core::telemetry::CLAUSES_ANALYZED_TOTAL;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Summary recorded when there is nothing to analyze
pub const EMPTY_CLAUSE_MESSAGE: &str = "Empty clause text";

/// Build the analysis prompt for one clause
pub fn analysis_prompt(clause_text: &str) -> String {
    format!(
        r#"Analyze this legal clause and respond in pure JSON format only:
{clause_text}

Required JSON structure:
{{
    "Clause Type": "[type]",
    "Summary": "[plain English summary]",
    "Risk Factors": ["list", "of", "risks"]
}}

Important:
1. Only return valid JSON
2. Keep summaries concise (1-2 sentences)
3. Focus on practical business implications
4. Highlight unusual or one-sided terms"#
    )
}

/// Analyzes clauses one at a time
pub struct ClauseAnalyzer {
    model: GatedModel,
    scorer: RiskScorer,
}

impl ClauseAnalyzer {
    /// Create an analyzer over `model`, pacing calls through `limiter`
    pub fn new(
        model: Arc<dyn LanguageModel>,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
        scorer: RiskScorer,
    ) -> Self {
        Self {
            model: GatedModel::new(model, limiter, retry),
            scorer,
        }
    }

    /// The gated model used for calls
    pub fn model(&self) -> &GatedModel {
        &self.model
    }

    /// The keyword scorer
    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Analyze one clause. Failures become `Error` records instead of errors.
    pub async fn analyze(&self, clause_text: &str) -> ClauseAnalysisResult {
        if clause_text.trim().is_empty() {
            let result = ClauseAnalysisResult::error(clause_text, EMPTY_CLAUSE_MESSAGE);
            record(&result, "empty");
            return result;
        }

        match self.try_analyze(clause_text).await {
            Ok((result, outcome)) => {
                record(&result, outcome);
                result
            }
            Err(e) => {
                error!("Clause analysis failed: {}", e);
                let result = ClauseAnalysisResult::error(clause_text, format!("Analysis error: {}", e));
                record(&result, "error");
                result
            }
        }
    }

    /// Analyze a detected candidate's sentence text
    pub async fn analyze_candidate(&self, candidate: &CandidateClause) -> ClauseAnalysisResult {
        self.analyze(&candidate.text).await
    }

    async fn try_analyze(&self, clause_text: &str) -> Result<(ClauseAnalysisResult, &'static str)> {
        let prompt = analysis_prompt(clause_text);
        let raw = self.model.generate(&prompt).await?;

        let parsed = parse_response(&raw);
        let outcome = parsed.outcome();
        match &parsed {
            ParsedResponse::Parsed(_) => debug!("Parsed model response"),
            ParsedResponse::Fallback(_) => {
                warn!("Model response was not valid JSON, using fallback summary")
            }
            ParsedResponse::Failed(reason) => warn!("Could not interpret model response: {}", reason),
        }

        let analysis = parsed.into_analysis();
        let risk = self.scorer.score(clause_text);

        let result = ClauseAnalysisResult {
            clause_type: analysis
                .clause_type
                .unwrap_or_else(|| UNKNOWN_CLAUSE_TYPE.to_string()),
            original_text: clause_text.to_string(),
            summary: analysis.summary.unwrap_or_default(),
            risk_level: risk.level,
            risk_reasons: risk.reasons,
        };

        Ok((result, outcome))
    }
}

fn record(result: &ClauseAnalysisResult, outcome: &'static str) {
    metrics::counter!(
        CLAUSES_ANALYZED_TOTAL,
        "risk" => result.risk_level.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_clause() {
        let prompt = analysis_prompt("The Supplier may terminate at will.");

        assert!(prompt.starts_with("Analyze this legal clause and respond in pure JSON format only:\n"));
        assert!(prompt.contains("\nThe Supplier may terminate at will.\n\nRequired JSON structure:"));
        assert!(prompt.contains("\"Clause Type\": \"[type]\","));
        assert!(prompt.ends_with("4. Highlight unusual or one-sided terms"));
    }

    #[test]
    fn test_prompt_keeps_braces_literal() {
        let prompt = analysis_prompt("{not a placeholder}");
        assert!(prompt.contains("{not a placeholder}"));
        assert!(prompt.contains("{\n    \"Clause Type\""));
    }
}
