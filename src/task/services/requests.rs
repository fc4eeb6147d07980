//! Request payloads for task tree operations.

use crate::{
    identity::UserId,
    ordering::Position,
    project::domain::ProjectId,
    task::domain::{CommentId, DateRange, TaskId},
};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(super) project: ProjectId,
    pub(super) parent: Option<TaskId>,
    pub(super) position: Position,
    pub(super) title: String,
    pub(super) content: Option<String>,
    pub(super) deadline: Option<DateRange>,
    pub(super) involved_users: Vec<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request for a top-level task appended to the project.
    #[must_use]
    pub fn new(project: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project,
            parent: None,
            position: Position::Last,
            title: title.into(),
            content: None,
            deadline: None,
            involved_users: Vec::new(),
        }
    }

    /// Creates the task as a child of `parent`.
    #[must_use]
    pub const fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Places the task at `position` within its owner list.
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the deadline window.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateRange) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the involved users.
    #[must_use]
    pub fn with_involved_users(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.involved_users = users.into_iter().collect();
        self
    }
}

/// Request payload for moving a task between owner lists.
///
/// A `None` parent on either side stands for the top-level list of the
/// moved task's project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveChildRequest {
    pub(super) child: TaskId,
    pub(super) from_parent: Option<TaskId>,
    pub(super) to_parent: Option<TaskId>,
    pub(super) position: Position,
}

impl MoveChildRequest {
    /// Creates a request appending `child` to the destination list.
    #[must_use]
    pub const fn new(child: TaskId, from_parent: Option<TaskId>, to_parent: Option<TaskId>) -> Self {
        Self {
            child,
            from_parent,
            to_parent,
            position: Position::Last,
        }
    }

    /// Places the child at `position` in the destination list.
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Places the child at a visual slot of the destination list.
    #[must_use]
    pub const fn with_target_index(self, index: usize) -> Self {
        self.with_position(Position::Index(index))
    }

    /// Returns the task being moved.
    #[must_use]
    pub const fn child(&self) -> TaskId {
        self.child
    }
}

/// Request payload for commenting on a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentRequest {
    pub(super) task: TaskId,
    pub(super) content: String,
}

impl CreateCommentRequest {
    /// Creates a comment request.
    #[must_use]
    pub fn new(task: TaskId, content: impl Into<String>) -> Self {
        Self {
            task,
            content: content.into(),
        }
    }
}

/// Request payload for editing a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommentRequest {
    pub(super) comment: CommentId,
    pub(super) content: String,
}

impl UpdateCommentRequest {
    /// Creates a comment edit request.
    #[must_use]
    pub fn new(comment: CommentId, content: impl Into<String>) -> Self {
        Self {
            comment,
            content: content.into(),
        }
    }
}
