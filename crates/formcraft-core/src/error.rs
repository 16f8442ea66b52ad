//! Engine error taxonomy.
//!
//! Defined in `formcraft-core` so callers (stores, services, transport
//! adapters) can classify failures without string matching. Grading
//! failures always abort before anything is persisted; there is no
//! partial-credit-on-error behavior.

use thiserror::Error;

/// Errors surfaced by the grading and analytics engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The submission is malformed or references questions outside the
    /// form — the caller's fault, no partial effect.
    #[error("invalid submission: {0}")]
    Validation(String),

    /// A question in the form carries an unrecognized type string — a
    /// form data integrity issue, surfaced rather than retried.
    #[error("unknown question type at question index {question_index}")]
    UnknownQuestionType { question_index: usize },

    /// A referenced form or response does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl EngineError {
    /// Shorthand for a [`EngineError::NotFound`] about a form.
    pub fn form_not_found(id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: "form",
            id: id.into(),
        }
    }

    /// Shorthand for a [`EngineError::NotFound`] about a response.
    pub fn response_not_found(id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: "response",
            id: id.into(),
        }
    }

    /// Returns `true` if this error was caused by respondent input.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }
}
