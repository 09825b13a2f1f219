//! Error types for ClauseWise

/// Result type alias using ClauseWise's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ClauseWise operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input document has an extension we cannot extract
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Document container or content could not be decoded
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Transient quota/rate-limit signal from the LLM backend
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Rate-limit retries were used up
    #[error("rate limit retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of calls made
        attempts: u32,
        /// Message of the final rate-limit error
        last: String,
    },

    /// Any other LLM backend failure
    #[error("llm error: {0}")]
    Llm(String),

    /// HTTP transport errors, with the request URL stripped
    #[error("http error: {0}")]
    Http(reqwest::Error),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Result table read/write errors
    #[error("report error: {0}")]
    Report(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs can carry credentials
        Self::Http(err.without_url())
    }
}

impl Error {
    /// Create a new extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new rate-limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a new LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a new report error
    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is a transient quota signal worth retrying.
    ///
    /// Backends that only surface a message (no status code) are recognised
    /// by a "quota" or "429" mention.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Llm(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("quota") || msg.contains("429")
            }
            _ => false,
        }
    }
}
