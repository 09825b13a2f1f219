//! Sentence segmentation for clause expansion
//!
//! Unicode sentence boundaries (UAX #29) split too eagerly on legal text:
//! "Acme Inc. The Supplier" becomes two sentences. Segments ending in a known
//! abbreviation are joined with the segment that follows.

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into sentences, borrowing from the input
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    abbreviations: HashSet<String>,
}

impl SentenceSplitter {
    pub fn new() -> Self {
        let common_abbrevs = [
            "dr", "mr", "mrs", "ms", "prof", "sr", "jr",
            "inc", "ltd", "corp", "co", "llc", "plc",
            "e.g", "i.e", "vs", "etc", "approx", "viz",
            "u.s", "u.k", "p.m", "a.m",
            "no", "nos", "sec", "art", "para", "cl", "ch",
        ];

        Self {
            abbreviations: common_abbrevs.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn with_custom_abbreviations(mut self, abbreviations: &[&str]) -> Self {
        for abbrev in abbreviations {
            self.abbreviations
                .insert(abbrev.trim_end_matches('.').to_lowercase());
        }
        self
    }

    /// Split `text` into sentences. Slices keep their trailing whitespace.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut pending: Option<usize> = None;

        for (idx, segment) in text.split_sentence_bound_indices() {
            let start = pending.take().unwrap_or(idx);
            let end = idx + segment.len();

            if end < text.len() && self.ends_with_abbreviation(segment) {
                pending = Some(start);
                continue;
            }

            sentences.push(&text[start..end]);
        }

        if let Some(start) = pending {
            sentences.push(&text[start..]);
        }

        sentences
    }

    fn ends_with_abbreviation(&self, segment: &str) -> bool {
        let Some(body) = segment.trim_end().strip_suffix('.') else {
            return false;
        };

        let word = body
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or("")
            .trim_start_matches(|c: char| !c.is_alphanumeric());

        !word.is_empty() && self.abbreviations.contains(&word.to_lowercase())
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        let splitter = SentenceSplitter::new();
        let sentences = splitter.split("The term is one year. Either party may terminate. ");
        assert_eq!(sentences, vec!["The term is one year. ", "Either party may terminate. "]);
    }

    #[test]
    fn test_abbreviation_does_not_split() {
        let splitter = SentenceSplitter::new();
        let sentences = splitter.split("Services are provided by Acme Inc. The Client shall pay. Done.");
        assert_eq!(
            sentences,
            vec!["Services are provided by Acme Inc. The Client shall pay. ", "Done."]
        );
    }

    #[test]
    fn test_custom_abbreviation() {
        let splitter = SentenceSplitter::new().with_custom_abbreviations(&["Sched."]);
        let sentences = splitter.split("See Sched. The fees apply.");
        assert_eq!(sentences, vec!["See Sched. The fees apply."]);
    }

    #[test]
    fn test_slices_cover_input() {
        let splitter = SentenceSplitter::new();
        let text = "One. Two? Three! Mr. Four e.g. five. ";
        let joined: String = splitter.split(text).concat();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_empty() {
        assert!(SentenceSplitter::new().split("").is_empty());
    }
}
