//! Mock language model for testing
//!
//! Replays scripted responses and errors, counts calls, and records when each
//! call arrived so rate-limit pacing can be checked under a paused clock.

use async_trait::async_trait;
use clausewise_core::{Error, LanguageModel, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::time::Instant;

/// A configurable mock model
pub struct MockModel {
    script: Mutex<VecDeque<Result<String>>>,
    default_response: String,
    prompts: Mutex<Vec<String>>,
    call_times: Mutex<Vec<Instant>>,
    call_count: AtomicU32,
}

impl MockModel {
    /// A model that answers every prompt with `response`
    pub fn new(response: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_response: response.to_string(),
            prompts: Mutex::new(Vec::new()),
            call_times: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Queue a response ahead of the default one
    pub fn then_respond(self, response: &str) -> Self {
        self.script.lock().push_back(Ok(response.to_string()));
        self
    }

    /// Queue an error ahead of the default response
    pub fn then_fail(self, error: Error) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// A model that always reports a rate-limit error
    pub fn always_rate_limited() -> AlwaysRateLimited {
        AlwaysRateLimited {
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().clone()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.call_times.lock().push(Instant::now());
        self.prompts.lock().push(prompt.to_string());

        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_response.clone()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Fails every call with a quota error
pub struct AlwaysRateLimited {
    call_count: AtomicU32,
}

impl AlwaysRateLimited {
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LanguageModel for AlwaysRateLimited {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Err(Error::rate_limited("429 quota exceeded"))
    }

    fn name(&self) -> &str {
        "rate-limited"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausewise_classifiers::{ClauseAnalyzer, RiskScorer};
    use clausewise_core::{CandidateClause, RateLimiter, RiskLevel, RetryPolicy};
    use std::sync::Arc;
    use std::time::Duration;

    const TERMINATION_JSON: &str = r#"{
    "Clause Type": "Termination",
    "Summary": "Either party can end the agreement on 30 days notice.",
    "Risk Factors": ["short notice"]
}"#;

    const CLAUSE: &str =
        "This Agreement shall remain in full force and may be terminated by either party with 30 days notice";

    fn analyzer(model: Arc<dyn LanguageModel>) -> ClauseAnalyzer {
        ClauseAnalyzer::new(
            model,
            Arc::new(RateLimiter::default()),
            RetryPolicy::default(),
            RiskScorer::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_clause_skips_model() {
        let model = Arc::new(MockModel::new(TERMINATION_JSON));
        let analyzer = analyzer(model.clone());

        for text in ["", "   "] {
            let result = analyzer.analyze(text).await;
            assert!(result.is_error());
            assert_eq!(result.summary, "Empty clause text");
            assert_eq!(result.risk_level, RiskLevel::None);
            assert!(result.risk_reasons.is_empty());
        }

        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fenced_json_response() {
        let fenced = format!("```json\n{}\n```", TERMINATION_JSON);
        let model = Arc::new(MockModel::new(&fenced));
        let analyzer = analyzer(model.clone());

        let result = analyzer.analyze(CLAUSE).await;

        assert_eq!(result.clause_type, "Termination");
        assert_eq!(result.summary, "Either party can end the agreement on 30 days notice.");
        assert_eq!(result.original_text, CLAUSE);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.risk_reasons, vec!["Contains 'may be'".to_string()]);

        assert_eq!(model.call_count(), 1);
        assert!(model.prompts()[0].contains(CLAUSE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_risk_comes_from_keywords_not_model() {
        let model = Arc::new(MockModel::new(
            r#"{"Clause Type": "Liability", "Summary": "Harmless.", "Risk Factors": []}"#,
        ));
        let analyzer = analyzer(model);

        let result = analyzer
            .analyze("Either party's liability is uncapped and the indemnifying party shall be solely responsible")
            .await;

        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(
            result.risk_reasons,
            vec![
                "Contains 'uncapped'".to_string(),
                "Contains 'solely responsible'".to_string()
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_response_falls_back() {
        let model = Arc::new(MockModel::new(
            r#"{"Clause Type": "Termination", "Summary": "Ends on notice.", "Risk Factors": ["x"]"#,
        ));
        let analyzer = analyzer(model);

        let result = analyzer.analyze(CLAUSE).await;

        assert!(!result.is_error());
        assert_eq!(result.clause_type, "Unknown");
        assert_eq!(result.summary, "Ends on notice.");
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_response_is_unknown_and_empty() {
        let model = Arc::new(MockModel::new(TERMINATION_JSON).then_respond("  "));
        let analyzer = analyzer(model);

        let result = analyzer.analyze(CLAUSE).await;
        assert_eq!(result.clause_type, "Unknown");
        assert_eq!(result.summary, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_error_becomes_sentinel() {
        let model = Arc::new(MockModel::new(TERMINATION_JSON).then_fail(Error::llm("backend unavailable")));
        let analyzer = analyzer(model.clone());

        let failed = analyzer.analyze(CLAUSE).await;
        assert!(failed.is_error());
        assert_eq!(failed.clause_type, "Error");
        assert_eq!(failed.summary, "Analysis error: llm error: backend unavailable");
        assert_eq!(failed.risk_level, RiskLevel::None);

        // The next clause is unaffected
        let next = analyzer.analyze(CLAUSE).await;
        assert_eq!(next.clause_type, "Termination");
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_rate_limit_is_retried() {
        let model = Arc::new(
            MockModel::new(TERMINATION_JSON).then_fail(Error::rate_limited("429 Too Many Requests")),
        );
        let analyzer = analyzer(model.clone());

        let result = analyzer.analyze(CLAUSE).await;

        assert_eq!(result.clause_type, "Termination");
        assert_eq!(model.call_count(), 2);

        let times = model.call_times();
        assert!(times[1] - times[0] >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_rate_limit_stops_at_cap() {
        let model = Arc::new(MockModel::always_rate_limited());
        let analyzer = ClauseAnalyzer::new(
            model.clone(),
            Arc::new(RateLimiter::default()),
            RetryPolicy::new(3, Duration::from_secs(5)),
            RiskScorer::default(),
        );

        let result = analyzer.analyze(CLAUSE).await;

        assert_eq!(model.call_count(), 3);
        assert!(result.is_error());
        assert!(result
            .summary
            .starts_with("Analysis error: rate limit retries exhausted after 3 attempts"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_calls_are_spaced() {
        let model = Arc::new(MockModel::new(TERMINATION_JSON));
        let analyzer = analyzer(model.clone());

        analyzer.analyze(CLAUSE).await;
        analyzer.analyze(CLAUSE).await;

        let times = model.call_times();
        assert_eq!(times.len(), 2);
        assert!(times[1] - times[0] >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_is_shared_between_analyzers() {
        let model = Arc::new(MockModel::new(TERMINATION_JSON));
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(500)));
        let first = ClauseAnalyzer::new(model.clone(), limiter.clone(), RetryPolicy::default(), RiskScorer::default());
        let second = ClauseAnalyzer::new(model.clone(), limiter, RetryPolicy::default(), RiskScorer::default());

        first.analyze(CLAUSE).await;
        second.analyze(CLAUSE).await;

        let times = model.call_times();
        assert!(times[1] - times[0] >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_candidate_uses_sentence_text() {
        let model = Arc::new(MockModel::new(TERMINATION_JSON));
        let analyzer = analyzer(model.clone());

        let candidate = CandidateClause {
            clause_type: "termination".to_string(),
            start: 0,
            end: 8,
            text: CLAUSE.to_string(),
        };
        let result = analyzer.analyze_candidate(&candidate).await;

        assert_eq!(result.original_text, CLAUSE);
        assert!(model.prompts()[0].contains(CLAUSE));
    }
}
