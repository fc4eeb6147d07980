//! Task comment aggregate.

use super::{CommentId, TaskDomainError, TaskId};
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    id: CommentId,
    task: TaskId,
    author: UserId,
    content: String,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Persisted comment identifier.
    pub id: CommentId,
    /// Persisted owning task.
    pub task: TaskId,
    /// Persisted author.
    pub author: UserId,
    /// Persisted content.
    pub content: String,
    /// Persisted soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskComment {
    /// Creates a comment on `task` by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyComment`] when the content is blank.
    pub fn new(
        task: TaskId,
        author: UserId,
        content: &str,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: CommentId::new(),
            task,
            author,
            content: normalize_content(content)?,
            deleted_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            task: data.task,
            author: data.author,
            content: data.content,
            deleted_at: data.deleted_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the task the comment belongs to.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the soft-deletion timestamp, if deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` when the comment is soft-deleted.
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

    /// Returns `true` when `user` wrote the comment.
    #[must_use]
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author == user
    }

    /// Replaces the content.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyComment`] when the content is blank.
    pub fn edit(&mut self, content: &str, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.content = normalize_content(content)?;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Soft-deletes the comment. Returns `false` when already deleted.
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
        self.updated_at = clock.utc();
        true
    }
}

fn normalize_content(content: &str) -> Result<String, TaskDomainError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyComment);
    }
    Ok(trimmed.to_owned())
}
