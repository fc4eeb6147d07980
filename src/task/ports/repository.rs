//! Repository ports for task and comment lookup.
//!
//! Writes are staged through [`crate::store::UnitOfWork`] so that owner
//! lists and the tasks they reference change together.

use crate::{
    project::domain::ProjectId,
    store::{DeletedFilter, StoreResult},
    task::domain::{CommentId, Task, TaskComment, TaskId},
};
use async_trait::async_trait;

/// Task read contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist or is excluded by
    /// `filter`.
    async fn find_task(&self, id: TaskId, filter: DeletedFilter) -> StoreResult<Option<Task>>;

    /// Finds several tasks, returned in the order of `ids`.
    ///
    /// Identifiers that do not resolve are skipped.
    async fn find_tasks(&self, ids: &[TaskId], filter: DeletedFilter) -> StoreResult<Vec<Task>>;

    /// Returns every task of a project, oldest first.
    async fn find_tasks_by_project(
        &self,
        project: ProjectId,
        filter: DeletedFilter,
    ) -> StoreResult<Vec<Task>>;
}

/// Comment read contract.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Finds a comment by identifier.
    ///
    /// Returns `None` when the comment does not exist or is excluded by
    /// `filter`.
    async fn find_comment(
        &self,
        id: CommentId,
        filter: DeletedFilter,
    ) -> StoreResult<Option<TaskComment>>;

    /// Finds several comments, returned in the order of `ids`.
    ///
    /// Identifiers that do not resolve are skipped.
    async fn find_comments(
        &self,
        ids: &[CommentId],
        filter: DeletedFilter,
    ) -> StoreResult<Vec<TaskComment>>;
}
