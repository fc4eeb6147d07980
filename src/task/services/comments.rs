//! Comment operations on tasks.

use super::{
    CreateCommentRequest, TaskTreeError, TaskTreeResult, TaskTreeService, UpdateCommentRequest,
};
use crate::{
    identity::UserId,
    project::ports::AccessGate,
    store::{DeletedFilter, TreeStore},
    task::domain::{CommentId, TaskComment},
};
use mockable::Clock;

impl<S, G, C> TaskTreeService<S, G, C>
where
    S: TreeStore,
    G: AccessGate,
    C: Clock + Send + Sync,
{
    /// Posts a comment on a live task of an accessible project.
    ///
    /// The comment insert and the task's comment list update commit
    /// together.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the task is absent or its
    /// project inaccessible, and [`TaskTreeError::Domain`] for blank content.
    pub async fn create_comment(
        &self,
        requester: UserId,
        request: CreateCommentRequest,
    ) -> TaskTreeResult<TaskComment> {
        let mut task = self.load_live_task(request.task).await?;
        self.ensure_task_access(requester, &task).await?;
        let comment = TaskComment::new(task.id(), requester, &request.content, &*self.clock)?;
        let project = task.project();
        let clock = &*self.clock;

        self.mover
            .run_atomic("create_comment", |unit| -> TaskTreeResult<()> {
                task.append_comment(comment.id(), clock);
                unit.insert_comment(comment.clone());
                unit.save_task(task);
                Ok(())
            })
            .await?;

        self.record_activity(&[project]).await;
        Ok(comment)
    }

    /// Edits a comment. Only its author may do so.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the comment is absent,
    /// deleted, or written by someone else.
    pub async fn update_comment(
        &self,
        requester: UserId,
        request: UpdateCommentRequest,
    ) -> TaskTreeResult<TaskComment> {
        let mut comment = self
            .load_authored_comment(requester, request.comment, DeletedFilter::Exclude)
            .await?;
        comment.edit(&request.content, &*self.clock)?;
        self.save_comment("update_comment", comment).await
    }

    /// Soft-deletes a comment. Only its author may do so.
    ///
    /// The comment stays referenced by its task and is filtered out of
    /// expanded reads.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the comment is absent,
    /// already deleted, or written by someone else.
    pub async fn remove_comment(
        &self,
        requester: UserId,
        id: CommentId,
    ) -> TaskTreeResult<CommentId> {
        let mut comment = self
            .load_authored_comment(requester, id, DeletedFilter::Exclude)
            .await?;
        comment.mark_deleted(&*self.clock);
        self.save_comment("remove_comment", comment).await?;
        Ok(id)
    }

    /// Restores a soft-deleted comment. Restoring a live comment is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the comment is absent or
    /// written by someone else.
    pub async fn restore_comment(
        &self,
        requester: UserId,
        id: CommentId,
    ) -> TaskTreeResult<CommentId> {
        let mut comment = self
            .load_authored_comment(requester, id, DeletedFilter::Include)
            .await?;
        if comment.restore(&*self.clock) {
            self.save_comment("restore_comment", comment).await?;
        }
        Ok(id)
    }

    async fn load_authored_comment(
        &self,
        requester: UserId,
        id: CommentId,
        filter: DeletedFilter,
    ) -> TaskTreeResult<TaskComment> {
        self.store
            .find_comment(id, filter)
            .await?
            .filter(|comment| comment.is_authored_by(requester))
            .ok_or_else(|| TaskTreeError::not_found(id))
    }

    async fn save_comment(
        &self,
        operation: &'static str,
        comment: TaskComment,
    ) -> TaskTreeResult<TaskComment> {
        self.mover
            .run_atomic(operation, |unit| -> TaskTreeResult<()> {
                unit.save_comment(comment.clone());
                Ok(())
            })
            .await?;
        Ok(comment)
    }
}
