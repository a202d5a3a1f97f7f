//! Error types for Gadget Advisor
//!
//! Library code returns [`AdvisorError`]; the binary wraps it in `anyhow`.

use thiserror::Error;

/// Main error type for the advisor library
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Query was blank after trimming
    #[error("Query must not be empty")]
    EmptyQuery,

    /// Search state machine transition errors
    #[error("Invalid state transition from {from} via {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Generative backend errors (non-success status, blocked prompt, empty candidates)
    #[error("Generation API error: {0}")]
    GenerationApi(String),

    /// Backend answered but the payload does not have the requested shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// News API errors
    #[error("News API error: {0}")]
    NewsApi(String),

    /// Tracker store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Comparison already holds its maximum number of products
    #[error("You can only compare {limit} products at a time.")]
    CompareFull { limit: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("Advisor error: {0}")]
    Generic(String),
}

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Convert anyhow errors to AdvisorError
impl From<anyhow::Error> for AdvisorError {
    fn from(err: anyhow::Error) -> Self {
        AdvisorError::Generic(err.to_string())
    }
}
