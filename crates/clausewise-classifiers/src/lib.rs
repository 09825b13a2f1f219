//! ClauseWise Classifiers
//!
//! Clause detection and analysis for contract text.
//!
//! The pipeline per document:
//! - Detection: regex categories over the full text, each match widened to
//!   its sentence
//! - Scoring: whole-word keyword tiers decide the risk level
//! - Analysis: one gated model call per clause for type and summary, with
//!   tolerant parsing of the response

pub mod analyzer;
pub mod config;
pub mod patterns;
pub mod response;
pub mod risk;
pub mod sentence;

pub use analyzer::{analysis_prompt, ClauseAnalyzer, EMPTY_CLAUSE_MESSAGE};
pub use config::{ClassifierConfig, ClausePatternSpec, DetectionConfig, RiskKeywordTable};
pub use patterns::{ClauseDetector, ClausePattern};
pub use response::{parse_response, LlmAnalysis, ParsedResponse};
pub use risk::{RiskAssessment, RiskScorer};
pub use sentence::SentenceSplitter;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::ClauseAnalyzer;
    pub use crate::config::{ClassifierConfig, DetectionConfig, RiskKeywordTable};
    pub use crate::patterns::ClauseDetector;
    pub use crate::response::{parse_response, ParsedResponse};
    pub use crate::risk::{RiskAssessment, RiskScorer};
}
