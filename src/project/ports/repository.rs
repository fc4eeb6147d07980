//! Repository port for project lookup.
//!
//! Writes are staged through [`crate::store::UnitOfWork`].

use crate::{
    identity::CompanyId,
    project::domain::{Project, ProjectId},
    store::{DeletedFilter, StoreResult},
};
use async_trait::async_trait;

/// Project read contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist or is excluded by
    /// `filter`.
    async fn find_project(
        &self,
        id: ProjectId,
        filter: DeletedFilter,
    ) -> StoreResult<Option<Project>>;

    /// Returns the projects of a company, oldest first.
    async fn find_projects_by_company(
        &self,
        company: CompanyId,
        filter: DeletedFilter,
    ) -> StoreResult<Vec<Project>>;
}
