//! Defensive parsing of model responses
//!
//! Models asked for "pure JSON" still wrap it in markdown fences, add prose
//! around it, or cut it short. Parsing proceeds in stages:
//!
//! 1. strip a code fence (```` ```json ```` preferred, then any ```` ``` ````),
//! 2. drop text before the first `{` and after the last `}`,
//! 3. strict JSON parse,
//! 4. on failure, salvage a summary from a `"Summary":` marker or the first
//!    200 characters of the raw text.
//!
//! The outcome is tagged so callers can tell which stage produced it.

use clausewise_core::UNKNOWN_CLAUSE_TYPE;
use serde_json::{Map, Value};

const CLAUSE_TYPE_KEY: &str = "Clause Type";
const SUMMARY_KEY: &str = "Summary";
const RISK_FACTORS_KEY: &str = "Risk Factors";
const SUMMARY_MARKER: &str = "\"Summary\":";
const FALLBACK_SUMMARY_CHARS: usize = 200;

/// Fields the model was asked to return
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmAnalysis {
    pub clause_type: Option<String>,
    pub summary: Option<String>,
    pub risk_factors: Vec<String>,
}

/// How a response was interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// Valid JSON object after fence/brace repair
    Parsed(LlmAnalysis),

    /// JSON was unusable; summary salvaged from the raw text
    Fallback(LlmAnalysis),

    /// Nothing usable in the response
    Failed(String),
}

impl ParsedResponse {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Stage name for logs and metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Parsed(_) => "parsed",
            Self::Fallback(_) => "fallback",
            Self::Failed(_) => "failed",
        }
    }

    /// The analysis fields; a failed parse yields an unknown, empty analysis
    pub fn into_analysis(self) -> LlmAnalysis {
        match self {
            Self::Parsed(analysis) | Self::Fallback(analysis) => analysis,
            Self::Failed(_) => LlmAnalysis {
                clause_type: Some(UNKNOWN_CLAUSE_TYPE.to_string()),
                ..Default::default()
            },
        }
    }
}

/// Interpret a raw model response
pub fn parse_response(raw: &str) -> ParsedResponse {
    let cleaned = repair_braces(strip_code_fence(raw));

    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => ParsedResponse::Parsed(analysis_from_object(&map)),
        _ => fallback(raw),
    }
}

/// Inner content of the first code fence, trimmed; the whole text otherwise
pub fn strip_code_fence(text: &str) -> &str {
    let inner = if let Some(pos) = text.find("```json") {
        fence_body(&text[pos + "```json".len()..])
    } else if let Some(pos) = text.find("```") {
        fence_body(&text[pos + "```".len()..])
    } else {
        text
    };

    inner.trim()
}

fn fence_body(rest: &str) -> &str {
    rest.find("```").map_or(rest, |end| &rest[..end])
}

/// Trim anything outside the outermost braces
pub fn repair_braces(text: &str) -> &str {
    let mut text = text;

    if !text.starts_with('{') {
        if let Some(open) = text.find('{') {
            text = &text[open..];
        }
    }

    if !text.ends_with('}') {
        if let Some(close) = text.rfind('}') {
            text = &text[..=close];
        }
    }

    text
}

/// The quoted string following the first `"Summary":` marker
pub fn extract_summary(raw: &str) -> Option<String> {
    let (_, after) = raw.split_once(SUMMARY_MARKER)?;
    let section = after.split(SUMMARY_MARKER).next().unwrap_or(after);

    let mut parts = section.splitn(3, '"');
    let _leading = parts.next()?;
    let quoted = parts.next()?;
    parts.next()?;

    Some(quoted.to_string())
}

fn fallback(raw: &str) -> ParsedResponse {
    if raw.trim().is_empty() {
        return ParsedResponse::Failed("empty response".to_string());
    }

    let summary = extract_summary(raw).unwrap_or_else(|| {
        let head: String = raw.chars().take(FALLBACK_SUMMARY_CHARS).collect();
        head.trim().to_string()
    });

    ParsedResponse::Fallback(LlmAnalysis {
        clause_type: Some(UNKNOWN_CLAUSE_TYPE.to_string()),
        summary: Some(summary),
        risk_factors: Vec::new(),
    })
}

fn analysis_from_object(map: &Map<String, Value>) -> LlmAnalysis {
    let risk_factors = match map.get(RISK_FACTORS_KEY) {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(other) => value_text(other).into_iter().collect(),
        None => Vec::new(),
    };

    LlmAnalysis {
        clause_type: map.get(CLAUSE_TYPE_KEY).and_then(value_text),
        summary: map.get(SUMMARY_KEY).and_then(value_text),
        risk_factors,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
