//! Service-level errors for task tree operations.

use crate::{
    error::{EntityRef, ErrorKind},
    ordering::OrderingError,
    project::{domain::ProjectDomainError, ports::AccessError, services::ProjectServiceError},
    store::{StoreError, TransactionAborted},
    task::domain::{TaskDomainError, TaskId},
};
use thiserror::Error;

/// Reasons a requested placement is invalid.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PositionError {
    /// The sibling used for positioning is not in the target list.
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    /// The destination is the moved task or one of its descendants.
    #[error("task {child} cannot be placed under itself or its descendant {destination}")]
    Cycle {
        /// Task being moved.
        child: TaskId,
        /// Requested destination parent.
        destination: TaskId,
    },
}

/// Service-level errors for task tree operations.
#[derive(Debug, Error)]
pub enum TaskTreeError {
    /// The entity is absent, or the requester may not see or change it.
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// A create or move referenced an invalid position.
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),

    /// The unit of work failed to commit; nothing was applied.
    #[error(transparent)]
    TransactionAborted(#[from] TransactionAborted),

    /// Task domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Project domain validation failed.
    #[error(transparent)]
    ProjectDomain(#[from] ProjectDomainError),

    /// Store lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskTreeError {
    /// Returns the coarse classification for API adapters.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidPosition(_) => ErrorKind::InvalidPosition,
            Self::TransactionAborted(_) => ErrorKind::TransactionAborted,
            Self::Domain(_) | Self::ProjectDomain(_) => ErrorKind::Invalid,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    pub(super) fn not_found(entity: impl Into<EntityRef>) -> Self {
        Self::NotFound(entity.into())
    }
}

impl From<OrderingError> for TaskTreeError {
    fn from(err: OrderingError) -> Self {
        Self::InvalidPosition(PositionError::Ordering(err))
    }
}

impl From<AccessError> for TaskTreeError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound(project) => Self::not_found(project),
            AccessError::Store(store) => Self::Store(store),
        }
    }
}

impl From<ProjectServiceError> for TaskTreeError {
    fn from(err: ProjectServiceError) -> Self {
        match err {
            ProjectServiceError::NotFound(project) => Self::not_found(project),
            ProjectServiceError::InvalidPosition(ordering) => ordering.into(),
            ProjectServiceError::TransactionAborted(aborted) => Self::TransactionAborted(aborted),
            ProjectServiceError::Domain(domain) => Self::ProjectDomain(domain),
            ProjectServiceError::Store(store) => Self::Store(store),
        }
    }
}

/// Result type for task tree operations.
pub type TaskTreeResult<T> = Result<T, TaskTreeError>;
