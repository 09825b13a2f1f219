//! Pattern-based clause detection
//!
//! Every registry pattern is run over the whole document. Each raw match is
//! widened to the sentence that contains it, using a fixed character window
//! on either side of the match as segmentation context.

use crate::config::{ClausePatternSpec, DetectionConfig};
use crate::sentence::SentenceSplitter;
use clausewise_core::{CandidateClause, Error, Result};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// A compiled clause category
#[derive(Debug, Clone)]
pub struct ClausePattern {
    name: String,
    regex: Regex,
}

impl ClausePattern {
    /// Compile a case-insensitive pattern
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::config(format!("Invalid pattern for '{}': {}", name, e)))?;

        Ok(Self { name, regex })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Finds candidate clauses in contract text
#[derive(Debug, Clone)]
pub struct ClauseDetector {
    patterns: Vec<ClausePattern>,
    context_window: usize,
    splitter: SentenceSplitter,
}

impl ClauseDetector {
    /// Create a detector from an ordered pattern registry
    pub fn new(specs: &[ClausePatternSpec], context_window: usize) -> Result<Self> {
        let patterns = specs
            .iter()
            .map(|spec| ClausePattern::new(spec.name.clone(), &spec.pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            context_window,
            splitter: SentenceSplitter::new(),
        })
    }

    /// Create a detector from configuration
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        Self::new(&config.patterns, config.context_window)
    }

    /// Use a custom sentence splitter
    pub fn with_splitter(mut self, splitter: SentenceSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Category names in registry order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name())
    }

    /// Find all candidate clauses, sorted by start offset.
    ///
    /// Categories are independent: the same passage may appear once per
    /// category that matches it.
    pub fn detect(&self, text: &str) -> Vec<CandidateClause> {
        if text.is_empty() {
            return Vec::new();
        }

        let offsets = CharOffsets::new(text);
        let mut clauses = Vec::new();

        for pattern in &self.patterns {
            for m in pattern.regex.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }

                clauses.push(CandidateClause {
                    clause_type: pattern.name.clone(),
                    start: offsets.char_index(m.start()),
                    end: offsets.char_index(m.end()),
                    text: self.expand(text, &offsets, m.start(), m.end()),
                });
            }
        }

        // Stable: registry order breaks ties at the same offset
        clauses.sort_by_key(|c| c.start);

        debug!("Detected {} candidate clauses", clauses.len());
        clauses
    }

    /// Widen the byte span `[start, end)` to its containing sentence
    fn expand(&self, text: &str, offsets: &CharOffsets, start: usize, end: usize) -> String {
        let first_char = offsets.char_index(start).saturating_sub(self.context_window);
        let last_char = offsets.char_index(end).saturating_add(self.context_window);
        let window = &text[offsets.byte_index(first_char)..offsets.byte_index(last_char)];

        let matched = &text[start..end];
        self.splitter
            .split(window)
            .into_iter()
            .find(|sentence| sentence.contains(matched))
            .map(|sentence| sentence.trim().to_string())
            .unwrap_or_else(|| matched.to_string())
    }
}

/// Byte/character offset conversion for one text
struct CharOffsets {
    starts: Vec<usize>,
    len: usize,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(i, _)| i).collect(),
            len: text.len(),
        }
    }

    /// Character index of the char beginning at `byte`
    fn char_index(&self, byte: usize) -> usize {
        self.starts.partition_point(|&b| b < byte)
    }

    /// Byte offset of character `index`, clamped to the text end
    fn byte_index(&self, index: usize) -> usize {
        self.starts.get(index).copied().unwrap_or(self.len)
    }
}
