//! Language model backends
//!
//! The analyzer talks to the model through [`LanguageModel`]: one prompt in,
//! one free-text response out. [`GeminiClient`] is the hosted backend;
//! [`RateLimiter`] and [`RetryPolicy`] gate every call.

mod gemini;
pub mod rate_limit;

pub use gemini::{GeminiClient, GeminiConfig};
pub use rate_limit::{GatedModel, RateLimiter, RetryPolicy};

use crate::Result;
use async_trait::async_trait;

/// Trait for text-in, text-out model backends
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a prompt and return the model's raw text response
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Backend name, used in logs
    fn name(&self) -> &str;
}
