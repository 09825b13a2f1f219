//! Plain-text rendering for terminal output

use clausewise_core::{CandidateClause, ClauseAnalysisResult};
use clausewise_report::{truncate_text, RiskSummary, SavedReport};

/// One block per analyzed clause
pub fn render_rows(rows: &[&ClauseAnalysisResult], width: usize) -> String {
    let mut out = String::new();

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("[{}] {} ({} risk)\n", i + 1, row.clause_type, row.risk_level));
        out.push_str(&format!("    Text:    {}\n", truncate_text(&row.original_text, width)));
        out.push_str(&format!("    Summary: {}\n", row.summary));
        if !row.risk_reasons.is_empty() {
            out.push_str(&format!("    Reasons: {}\n", row.joined_reasons()));
        }
        out.push('\n');
    }

    out
}

pub fn render_summary(summary: &RiskSummary) -> String {
    format!("Risk summary: {}", summary)
}

/// Detected clauses with category and character offsets
pub fn render_candidates(clauses: &[CandidateClause], width: usize) -> String {
    let mut out = String::new();

    for clause in clauses {
        out.push_str(&format!(
            "{:>7}..{:<7} {:<16} {}\n",
            clause.start,
            clause.end,
            clause.clause_type,
            truncate_text(&clause.text, width)
        ));
    }

    out
}

pub fn render_saved(reports: &[SavedReport]) -> String {
    let mut out = String::new();

    for report in reports {
        out.push_str(&format!(
            "{}  {}\n",
            report.modified.format("%Y-%m-%d %H:%M:%S"),
            report.file_name()
        ));
    }

    out
}
