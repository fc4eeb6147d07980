//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or changing task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The comment content is empty after trimming.
    #[error("comment content must not be empty")]
    EmptyComment,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
