//! Service layer for project management and top-level task ordering.

use crate::{
    error::ErrorKind,
    identity::{CompanyId, UserId},
    ordering::{OrderingError, Position},
    project::{
        domain::{NewProject, Project, ProjectDomainError, ProjectId},
        ports::ProjectRepository,
    },
    store::{AtomicWriter, DeletedFilter, StoreError, TransactionAborted, TransactionalMover},
    task::domain::TaskId,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    company: CompanyId,
    title: String,
    accesses: Vec<UserId>,
}

impl CreateProjectRequest {
    /// Creates a request with required project fields.
    #[must_use]
    pub fn new(company: CompanyId, title: impl Into<String>) -> Self {
        Self {
            company,
            title: title.into(),
            accesses: Vec::new(),
        }
    }

    /// Sets the users granted access on creation.
    #[must_use]
    pub fn with_accesses(mut self, accesses: impl IntoIterator<Item = UserId>) -> Self {
        self.accesses = accesses.into_iter().collect();
        self
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// The project is absent or the requester may not act on it.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
    /// A top-level positioning request referenced an absent sibling.
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] OrderingError),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// The unit of work failed to commit.
    #[error(transparent)]
    TransactionAborted(#[from] TransactionAborted),
    /// Store lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProjectServiceError {
    /// Returns the coarse classification for API adapters.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidPosition(_) => ErrorKind::InvalidPosition,
            Self::Domain(_) => ErrorKind::Invalid,
            Self::TransactionAborted(_) => ErrorKind::TransactionAborted,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project management and top-level list orchestration service.
pub struct ProjectService<S, C>
where
    S: ProjectRepository + AtomicWriter,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    mover: TransactionalMover<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for ProjectService<S, C>
where
    S: ProjectRepository + AtomicWriter,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            mover: self.mover.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> ProjectService<S, C>
where
    S: ProjectRepository + AtomicWriter,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            mover: TransactionalMover::new(Arc::clone(&store)),
            store,
            clock,
        }
    }

    /// Creates a project managed by `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] for a blank title and
    /// [`ProjectServiceError::TransactionAborted`] when the insert fails.
    pub async fn create(
        &self,
        requester: UserId,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let project = Project::new(
            NewProject {
                company: request.company,
                title: request.title,
                manager: requester,
                accesses: request.accesses,
            },
            &*self.clock,
        )?;

        self.mover
            .run_atomic("create_project", |unit| -> ProjectServiceResult<()> {
                unit.insert_project(project.clone());
                Ok(())
            })
            .await?;
        tracing::debug!(project = %project.id(), "project created");
        Ok(project)
    }

    /// Loads a live project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project is absent
    /// or deleted.
    pub async fn get_by_id(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.load(id, DeletedFilter::Exclude).await
    }

    /// Loads a live project the requester has access to.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project is absent,
    /// deleted, or not accessible to `requester`.
    pub async fn get_with_access_check(
        &self,
        id: ProjectId,
        requester: UserId,
    ) -> ProjectServiceResult<Project> {
        let project = self.get_by_id(id).await?;
        ensure_can_access(&project, requester)?;
        Ok(project)
    }

    /// Lists the live projects of a company.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Store`] when the lookup fails.
    pub async fn list_by_company(&self, company: CompanyId) -> ProjectServiceResult<Vec<Project>> {
        Ok(self
            .store
            .find_projects_by_company(company, DeletedFilter::Exclude)
            .await?)
    }

    /// Returns the users with access to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the requester has no
    /// access.
    pub async fn accesses(
        &self,
        id: ProjectId,
        requester: UserId,
    ) -> ProjectServiceResult<Vec<UserId>> {
        let project = self.get_with_access_check(id, requester).await?;
        Ok(project.accesses().to_vec())
    }

    /// Renames a project. Only the manager may do so.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the requester is not
    /// the manager, or [`ProjectServiceError::Domain`] for a blank title.
    pub async fn update_title(
        &self,
        requester: UserId,
        id: ProjectId,
        title: &str,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.get_by_id(id).await?;
        ensure_is_manager(&project, requester)?;
        project.rename(title, &*self.clock)?;
        self.save("update_project_title", project).await
    }

    /// Grants access to additional users.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the requester has no
    /// access.
    pub async fn add_accesses(
        &self,
        requester: UserId,
        id: ProjectId,
        users: &[UserId],
    ) -> ProjectServiceResult<Project> {
        let mut project = self.get_with_access_check(id, requester).await?;
        project.grant_access(users.iter().copied(), &*self.clock);
        self.save("add_project_accesses", project).await
    }

    /// Revokes access from users; the manager's access cannot be revoked.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the requester has no
    /// access.
    pub async fn remove_accesses(
        &self,
        requester: UserId,
        id: ProjectId,
        users: &[UserId],
    ) -> ProjectServiceResult<Project> {
        let mut project = self.get_with_access_check(id, requester).await?;
        project.revoke_access(users, &*self.clock);
        self.save("remove_project_accesses", project).await
    }

    /// Soft-deletes a project. Only the manager may do so.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project is absent,
    /// already deleted, or the requester is not the manager.
    pub async fn remove(&self, requester: UserId, id: ProjectId) -> ProjectServiceResult<ProjectId> {
        let mut project = self.get_by_id(id).await?;
        ensure_is_manager(&project, requester)?;
        project.mark_deleted(&*self.clock);
        self.save("remove_project", project).await?;
        Ok(id)
    }

    /// Restores a soft-deleted project. Restoring a live project is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project is absent
    /// or the requester is not the manager.
    pub async fn restore(
        &self,
        requester: UserId,
        id: ProjectId,
    ) -> ProjectServiceResult<ProjectId> {
        let mut project = self.load(id, DeletedFilter::Include).await?;
        ensure_is_manager(&project, requester)?;
        if project.restore(&*self.clock) {
            self.save("restore_project", project).await?;
        }
        Ok(id)
    }

    /// Adds a task to a project's top-level list at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::InvalidPosition`] when `position`
    /// names an absent sibling, leaving the list unchanged.
    pub async fn add_top_child(
        &self,
        id: ProjectId,
        child: TaskId,
        position: Position,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.get_by_id(id).await?;
        self.mover
            .run_atomic("add_top_child", |unit| -> ProjectServiceResult<()> {
                project.add_top_child(child, position)?;
                unit.set_top_children(id, project.top_children().clone());
                Ok(())
            })
            .await?;
        Ok(project)
    }

    /// Removes a task from a project's top-level list.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project is absent.
    pub async fn remove_top_child(
        &self,
        id: ProjectId,
        child: TaskId,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.get_by_id(id).await?;
        self.mover
            .run_atomic("remove_top_child", |unit| -> ProjectServiceResult<()> {
                if project.remove_top_child(child) {
                    unit.set_top_children(id, project.top_children().clone());
                }
                Ok(())
            })
            .await?;
        Ok(project)
    }

    /// Repositions a task within a project's top-level list.
    ///
    /// A task that is not a top-level child leaves the list unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::InvalidPosition`] when `position`
    /// names an absent sibling.
    pub async fn sort_top_child(
        &self,
        id: ProjectId,
        child: TaskId,
        position: Position,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.get_by_id(id).await?;
        self.mover
            .run_atomic("sort_top_child", |unit| -> ProjectServiceResult<()> {
                if project.sort_top_child(child, position)?.is_some() {
                    unit.set_top_children(id, project.top_children().clone());
                }
                Ok(())
            })
            .await?;
        Ok(project)
    }

    /// Bumps a project's `task_updated_at` to the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::TransactionAborted`] when the write
    /// fails, for example because the project does not exist.
    pub async fn update_task_updated_at(&self, id: ProjectId) -> ProjectServiceResult<()> {
        let now = self.clock.utc();
        self.mover
            .run_atomic("update_task_updated_at", |unit| -> ProjectServiceResult<()> {
                unit.touch_project(id, now);
                Ok(())
            })
            .await
    }

    async fn load(&self, id: ProjectId, filter: DeletedFilter) -> ProjectServiceResult<Project> {
        self.store
            .find_project(id, filter)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))
    }

    async fn save(&self, operation: &'static str, project: Project) -> ProjectServiceResult<Project> {
        self.mover
            .run_atomic(operation, |unit| -> ProjectServiceResult<()> {
                unit.save_project(project.clone());
                Ok(())
            })
            .await?;
        Ok(project)
    }
}

/// Fails with [`ProjectServiceError::NotFound`] unless `user` has access.
///
/// # Errors
///
/// Returns [`ProjectServiceError::NotFound`] rather than a distinct
/// forbidden error so that access failures do not reveal existence.
pub fn ensure_can_access(project: &Project, user: UserId) -> ProjectServiceResult<()> {
    if project.grants_access_to(user) {
        Ok(())
    } else {
        Err(ProjectServiceError::NotFound(project.id()))
    }
}

/// Fails with [`ProjectServiceError::NotFound`] unless `user` is the manager.
///
/// # Errors
///
/// Returns [`ProjectServiceError::NotFound`] when `user` does not manage
/// the project.
pub fn ensure_is_manager(project: &Project, user: UserId) -> ProjectServiceResult<()> {
    if project.is_managed_by(user) {
        Ok(())
    } else {
        Err(ProjectServiceError::NotFound(project.id()))
    }
}
