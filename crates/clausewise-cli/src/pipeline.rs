//! Document analysis pipeline
//!
//! extract -> detect -> cap -> analyze each clause in order -> save

use crate::config::AppConfig;
use clausewise_classifiers::{ClauseAnalyzer, ClauseDetector, RiskScorer};
use clausewise_core::{AnalysisTable, CandidateClause, LanguageModel, Result, TextExtractor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Extraction and detection, without any model calls
pub struct DocumentScanner {
    extractor: TextExtractor,
    detector: ClauseDetector,
    max_clauses: Option<usize>,
}

impl DocumentScanner {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            extractor: TextExtractor::new()?,
            detector: ClauseDetector::from_config(&config.detection)?,
            max_clauses: config.max_clauses.filter(|&max| max > 0),
        })
    }

    /// Candidate clauses of the document at `path`, capped at `max_clauses`
    /// unless that is unset or zero
    pub fn scan(&self, path: &Path) -> Result<Vec<CandidateClause>> {
        let text = self.extractor.extract(path)?;

        let mut clauses = self.detector.detect(&text);
        info!("Detected {} candidate clauses", clauses.len());

        if let Some(max) = self.max_clauses {
            if clauses.len() > max {
                info!("Analyzing the first {} of {} clauses", max, clauses.len());
                clauses.truncate(max);
            }
        }

        Ok(clauses)
    }
}

/// Full analysis of one document
pub struct Pipeline {
    scanner: DocumentScanner,
    analyzer: ClauseAnalyzer,
}

/// Result of an analyze-and-save run
#[derive(Debug)]
pub struct RunOutput {
    pub table: AnalysisTable,
    pub saved_to: PathBuf,
}

impl Pipeline {
    /// Build a pipeline around `model`
    pub fn new(config: &AppConfig, model: Arc<dyn LanguageModel>) -> Result<Self> {
        let analyzer = ClauseAnalyzer::new(
            model,
            Arc::new(config.llm.rate_limiter()),
            config.llm.retry_policy(),
            RiskScorer::new(&config.risk)?,
        );

        Ok(Self {
            scanner: DocumentScanner::new(config)?,
            analyzer,
        })
    }

    /// Analyze every detected clause, one at a time, in detection order
    pub async fn run(&self, path: &Path) -> Result<AnalysisTable> {
        let clauses = self.scanner.scan(path)?;
        let total = clauses.len();

        let mut table = AnalysisTable::new();
        for (i, clause) in clauses.iter().enumerate() {
            info!("Analyzing clause {}/{} ({})", i + 1, total, clause.clause_type);
            table.push(self.analyzer.analyze_candidate(clause).await);
        }

        Ok(table)
    }

    /// Analyze the document and save the table under `output_dir`
    pub async fn run_and_persist(&self, path: &Path, output_dir: &Path) -> Result<RunOutput> {
        let table = self.run(path).await?;
        let saved_to = clausewise_report::save_table(&table, output_dir, &document_stem(path))?;

        Ok(RunOutput { table, saved_to })
    }
}

/// File stem used to name saved analyses
pub fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string())
}
