//! Call pacing and quota retry for model backends
//!
//! [`RateLimiter`] enforces a minimum interval between consecutive calls.
//! [`GatedModel`] wraps any [`LanguageModel`] with the limiter and a bounded
//! retry loop for rate-limit errors.

use super::LanguageModel;
use crate::telemetry::{LLM_CALLS_TOTAL, LLM_RETRIES_TOTAL};
use crate::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Minimum-interval gate holding its own last-call timestamp
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing one call per `min_interval`
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Configured minimum interval
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Time left before the next call may start
    pub fn remaining(&self) -> Duration {
        match *self.last_call.lock() {
            Some(last) => self.min_interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Wait until a call is allowed. Returns how long we slept.
    pub async fn acquire(&self) -> Duration {
        let wait = self.remaining();
        if !wait.is_zero() {
            debug!("Rate limiting: sleeping {:?} before next call", wait);
            tokio::time::sleep(wait).await;
        }
        self.touch();
        wait
    }

    /// Record that a call just finished
    pub fn touch(&self) {
        *self.last_call.lock() = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Retry settings for quota errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total calls allowed per prompt, including the first
    pub max_attempts: u32,

    /// Fixed wait after a rate-limit error
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is at least 1
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(5))
    }
}

/// A model wrapped with call pacing and quota retry
pub struct GatedModel {
    inner: Arc<dyn LanguageModel>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl GatedModel {
    /// Wrap `inner`, sharing `limiter` with any other gated model
    pub fn new(inner: Arc<dyn LanguageModel>, limiter: Arc<RateLimiter>, retry: RetryPolicy) -> Self {
        Self {
            inner,
            limiter,
            retry,
        }
    }

    /// The shared limiter
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}

#[async_trait]
impl LanguageModel for GatedModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.limiter.acquire().await;

            metrics::counter!(LLM_CALLS_TOTAL, "backend" => self.inner.name().to_string())
                .increment(1);
            let result = self.inner.generate(prompt).await;
            self.limiter.touch();

            match result {
                Ok(text) => return Ok(text),
                Err(e) if e.is_rate_limited() => {
                    if attempt >= self.retry.max_attempts {
                        return Err(Error::RetriesExhausted {
                            attempts: attempt,
                            last: e.to_string(),
                        });
                    }

                    warn!(
                        "Hit rate limit on {} (attempt {}/{}), waiting {:?}",
                        self.inner.name(),
                        attempt,
                        self.retry.max_attempts,
                        self.retry.backoff
                    );
                    metrics::counter!(LLM_RETRIES_TOTAL).increment(1);
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
