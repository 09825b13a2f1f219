//! ClauseWise Core
//!
//! Core types, traits, and utilities shared across ClauseWise components.
//!
//! This crate provides:
//! - The clause/analysis data model and risk levels
//! - Error types and result handling
//! - Plain-text extraction from PDF and DOCX contracts
//! - The language model trait, a Gemini backend, and call rate limiting
//! - Metric names shared by the analysis pipeline

pub mod error;
pub mod extract;
pub mod llm;
pub mod telemetry;
pub mod types;

pub use error::{Error, Result};
pub use extract::{DocumentFormat, TextExtractor};
pub use llm::{GatedModel, GeminiClient, GeminiConfig, LanguageModel, RateLimiter, RetryPolicy};
pub use types::{
    AnalysisTable, CandidateClause, ClauseAnalysisResult, RiskLevel, ERROR_CLAUSE_TYPE,
    UNKNOWN_CLAUSE_TYPE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::llm::{GatedModel, LanguageModel, RateLimiter, RetryPolicy};
    pub use crate::types::{AnalysisTable, CandidateClause, ClauseAnalysisResult, RiskLevel};
}
