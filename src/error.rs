//! Error classification shared across service layers.
//!
//! Service errors carry typed detail for logging and tests. Callers at the
//! API boundary only need the coarse [`ErrorKind`] to pick a response code.

use crate::{
    project::domain::ProjectId,
    task::domain::{CommentId, TaskId},
};
use std::fmt;

/// Coarse error classification exposed to API adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The entity is absent, or the caller may not see or change it.
    NotFound,
    /// A move or insert referenced a position that does not exist.
    InvalidPosition,
    /// An atomic unit of work failed to commit.
    TransactionAborted,
    /// Input failed domain validation.
    Invalid,
    /// An unexpected infrastructure failure.
    Internal,
}

/// Reference to a persisted entity, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A project document.
    Project(ProjectId),
    /// A task document.
    Task(TaskId),
    /// A task comment document.
    Comment(CommentId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project(id) => write!(f, "project {id}"),
            Self::Task(id) => write!(f, "task {id}"),
            Self::Comment(id) => write!(f, "comment {id}"),
        }
    }
}

impl From<ProjectId> for EntityRef {
    fn from(id: ProjectId) -> Self {
        Self::Project(id)
    }
}

impl From<TaskId> for EntityRef {
    fn from(id: TaskId) -> Self {
        Self::Task(id)
    }
}

impl From<CommentId> for EntityRef {
    fn from(id: CommentId) -> Self {
        Self::Comment(id)
    }
}
