//! Store-backed [`AccessGate`] implementation.

use crate::{
    identity::UserId,
    project::{
        domain::{Project, ProjectId},
        ports::{AccessError, AccessGate, ProjectRepository},
    },
    store::DeletedFilter,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Grants access to a live project's manager and the users in its accesses.
pub struct ProjectAccessGate<R>
where
    R: ProjectRepository,
{
    repository: Arc<R>,
}

impl<R> ProjectAccessGate<R>
where
    R: ProjectRepository,
{
    /// Creates a gate reading projects from `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> Clone for ProjectAccessGate<R>
where
    R: ProjectRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[async_trait]
impl<R> AccessGate for ProjectAccessGate<R>
where
    R: ProjectRepository,
{
    async fn can_access_project(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> Result<Project, AccessError> {
        self.repository
            .find_project(project, DeletedFilter::Exclude)
            .await?
            .filter(|found| found.grants_access_to(user))
            .ok_or(AccessError::NotFound(project))
    }
}
