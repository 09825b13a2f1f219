//! Metric names and descriptions
//!
//! Counters are emitted through the `metrics` facade; the binary installs
//! the recorder.

/// Model calls, labelled by `backend`
pub const LLM_CALLS_TOTAL: &str = "clausewise_llm_calls_total";

/// Rate-limit retries
pub const LLM_RETRIES_TOTAL: &str = "clausewise_llm_retries_total";

/// Analyzed clauses, labelled by `risk` and `outcome`
pub const CLAUSES_ANALYZED_TOTAL: &str = "clausewise_clauses_analyzed_total";

/// Register descriptions with the installed recorder
pub fn describe_metrics() {
    metrics::describe_counter!(LLM_CALLS_TOTAL, "Total number of model calls by backend");
    metrics::describe_counter!(
        LLM_RETRIES_TOTAL,
        "Total number of model calls retried after a rate limit"
    );
    metrics::describe_counter!(
        CLAUSES_ANALYZED_TOTAL,
        "Total number of clauses analyzed by risk level and outcome"
    );
}
