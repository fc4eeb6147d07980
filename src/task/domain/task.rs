//! Task aggregate root and task field types.

use super::{CommentId, TaskDomainError, TaskId, TaskStatus};
use crate::{
    identity::UserId,
    ordering::{ChildList, OrderingError, Position},
    project::domain::ProjectId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Optional start and end of a task's deadline window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Start of the window.
    pub from: Option<DateTime<Utc>>,
    /// End of the window.
    pub to: Option<DateTime<Utc>>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project: ProjectId,
    author: UserId,
    parent: Option<TaskId>,
    children: ChildList,
    involved_users: Vec<UserId>,
    comments: Vec<CommentId>,
    title: String,
    content: Option<String>,
    deadline: Option<DateRange>,
    status: TaskStatus,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning project.
    pub project: ProjectId,
    /// Creating user.
    pub author: UserId,
    /// Parent task; `None` for a top-level task.
    pub parent: Option<TaskId>,
    /// Title; trimmed on creation.
    pub title: String,
    /// Optional body text.
    pub content: Option<String>,
    /// Optional deadline window.
    pub deadline: Option<DateRange>,
    /// Users involved in the task.
    pub involved_users: Vec<UserId>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project: ProjectId,
    /// Persisted author.
    pub author: UserId,
    /// Persisted parent reference.
    pub parent: Option<TaskId>,
    /// Persisted children order.
    pub children: ChildList,
    /// Persisted involved users.
    pub involved_users: Vec<UserId>,
    /// Persisted comment order.
    pub comments: Vec<CommentId>,
    /// Persisted title.
    pub title: String,
    /// Persisted body text.
    pub content: Option<String>,
    /// Persisted deadline window.
    pub deadline: Option<DateRange>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update of task fields.
///
/// Only the fields that are set are applied; an unset field leaves the
/// current value unchanged rather than clearing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    content: Option<String>,
    deadline: Option<DateRange>,
    involved_users: Option<Vec<UserId>>,
    status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
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

    /// Replaces the involved users.
    #[must_use]
    pub fn with_involved_users(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.involved_users = Some(users.into_iter().collect());
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.deadline.is_none()
            && self.involved_users.is_none()
            && self.status.is_none()
    }
}

impl Task {
    /// Creates a new task in the `Ready` status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(data: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = normalize_title(&data.title)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            project: data.project,
            author: data.author,
            parent: data.parent,
            children: ChildList::new(),
            involved_users: dedupe_users(data.involved_users),
            comments: Vec::new(),
            title,
            content: data.content,
            deadline: data.deadline,
            status: TaskStatus::Ready,
            deleted_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project: data.project,
            author: data.author,
            parent: data.parent,
            children: data.children,
            involved_users: data.involved_users,
            comments: data.comments,
            title: data.title,
            content: data.content,
            deadline: data.deadline,
            status: data.status,
            deleted_at: data.deleted_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the parent task, or `None` for a top-level task.
    #[must_use]
    pub const fn parent(&self) -> Option<TaskId> {
        self.parent
    }

    /// Returns `true` when the task has no parent.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the ordered children.
    #[must_use]
    pub const fn children(&self) -> &ChildList {
        &self.children
    }

    /// Returns the involved users.
    #[must_use]
    pub fn involved_users(&self) -> &[UserId] {
        &self.involved_users
    }

    /// Returns the ordered comment identifiers.
    #[must_use]
    pub fn comments(&self) -> &[CommentId] {
        &self.comments
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body text.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the deadline window.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateRange> {
        self.deadline
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the soft-deletion timestamp, if deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` when the task is soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `user` authored the task.
    #[must_use]
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author == user
    }

    /// Applies the set fields of `patch`. Returns `false` for an empty patch.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the patch sets a blank
    /// title; nothing is applied in that case.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        if patch.is_empty() {
            return Ok(false);
        }
        if let Some(title) = patch.title.as_deref().map(normalize_title).transpose()? {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = Some(content);
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(users) = patch.involved_users {
            self.involved_users = dedupe_users(users);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.touch(clock);
        Ok(true)
    }

    /// Adds a child at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::UnknownSibling`] without changing the list
    /// when `position` names an absent sibling.
    pub fn add_child(&mut self, child: TaskId, position: Position) -> Result<usize, OrderingError> {
        self.children.place(child, position)
    }

    /// Removes a child; returns `false` when it was absent.
    pub fn remove_child(&mut self, child: TaskId) -> bool {
        self.children.remove(child)
    }

    /// Repositions an existing child.
    ///
    /// Returns `Ok(None)` when `child` is not in the list.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::UnknownSibling`] without changing the list
    /// when `position` names an absent sibling.
    pub fn sort_child(
        &mut self,
        child: TaskId,
        position: Position,
    ) -> Result<Option<usize>, OrderingError> {
        self.children.reposition(child, position)
    }

    /// Points the task at a new parent (`None` for top level).
    pub fn attach_to(&mut self, parent: Option<TaskId>, clock: &impl Clock) {
        self.parent = parent;
        self.touch(clock);
    }

    /// Moves the task to another project.
    pub fn rehome(&mut self, project: ProjectId, clock: &impl Clock) {
        self.project = project;
        self.touch(clock);
    }

    /// Appends a comment reference.
    pub fn append_comment(&mut self, comment: CommentId, clock: &impl Clock) {
        if !self.comments.contains(&comment) {
            self.comments.push(comment);
        }
        self.touch(clock);
    }

    /// Soft-deletes the task. Returns `false` when already deleted.
    pub fn mark_deleted(&mut self, clock: &impl Clock) -> bool {
        if self.is_deleted() {
            return false;
        }
        let now = clock.utc();
        self.deleted_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Clears the soft-deletion flag. Returns `false` when not deleted.
    pub fn restore(&mut self, clock: &impl Clock) -> bool {
        if !self.is_deleted() {
            return false;
        }
        self.deleted_at = None;
        self.touch(clock);
        true
    }

    /// Replaces the children list wholesale, as stored by a list write.
    pub(crate) fn replace_children(&mut self, children: ChildList) {
        self.children = children;
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn normalize_title(title: &str) -> Result<String, TaskDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn dedupe_users(users: Vec<UserId>) -> Vec<UserId> {
    let mut unique = Vec::with_capacity(users.len());
    for user in users {
        if !unique.contains(&user) {
            unique.push(user);
        }
    }
    unique
}
