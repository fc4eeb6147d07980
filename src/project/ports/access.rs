//! Authorisation port consulted before trust-sensitive task operations.

use crate::{
    identity::UserId,
    project::domain::{Project, ProjectId},
    store::StoreError,
};
use async_trait::async_trait;
use thiserror::Error;

/// Decides whether a user may work with a project's tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Returns the project when `user` has access to it.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotFound`] both when the project does not
    /// exist and when `user` lacks access, so callers cannot probe for
    /// existence.
    async fn can_access_project(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> Result<Project, AccessError>;
}

/// Errors returned by [`AccessGate`] implementations.
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    /// The project is absent or not visible to the user.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The project could not be loaded.
    #[error(transparent)]
    Store(#[from] StoreError),
}
