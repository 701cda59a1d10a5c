//! Catalog error types.
//!
//! Defined here so callers can match on lookup failures without string
//! matching. The grader itself is total and has no error type.

use thiserror::Error;

/// Errors from the exam catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No exam with the requested id.
    #[error("exam not found: {0}")]
    ExamNotFound(String),

    /// Two exams were registered under the same id.
    #[error("duplicate exam id: {0}")]
    DuplicateExamId(String),
}
