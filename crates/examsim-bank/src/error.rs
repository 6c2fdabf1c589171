//! Question bank error types.

use thiserror::Error;

/// Errors that can occur when fetching questions from a bank.
#[derive(Debug, Error)]
pub enum BankError {
    /// The API rejected the credentials.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// The requested subject or endpoint does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The bank served a question that breaks the option invariants.
    #[error("invalid question from bank: {0}")]
    InvalidQuestion(#[from] examsim_core::error::ModelError),
}
