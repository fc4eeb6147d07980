//! Error types for project domain validation.

use thiserror::Error;

/// Errors returned while constructing or changing projects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project title is empty after trimming.
    #[error("project title must not be empty")]
    EmptyTitle,
}
