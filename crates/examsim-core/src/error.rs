//! Core error types.
//!
//! Session transitions never fail: invalid navigation and mutation after the
//! session finished are ignored. The errors here cover malformed questions and
//! a question bank that has nothing to offer.

use thiserror::Error;

/// A question that violates the option invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The question has no options at all.
    #[error("question '{question}' has no options")]
    NoOptions { question: String },

    /// None of the options is marked correct.
    #[error("question '{question}' has no correct option")]
    NoCorrectOption { question: String },

    /// More than one option is marked correct.
    #[error("question '{question}' has {count} correct options, expected exactly one")]
    MultipleCorrectOptions { question: String, count: usize },

    /// Two options share an id.
    #[error("question '{question}' repeats option id '{option}'")]
    DuplicateOptionId { question: String, option: String },
}

/// Errors raised while starting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The bank returned no questions although some were requested.
    #[error("question bank '{bank}' returned no questions ({requested} requested)")]
    NoQuestions { bank: String, requested: u32 },

    /// The bank itself failed.
    #[error("question bank '{bank}' failed: {error:#}")]
    Bank { bank: String, error: anyhow::Error },
}
