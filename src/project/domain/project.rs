//! Project aggregate root.

use super::{ProjectDomainError, ProjectId};
use crate::{
    identity::{CompanyId, UserId},
    ordering::{ChildList, OrderingError, Position},
    task::domain::TaskId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    company: CompanyId,
    title: String,
    manager: UserId,
    accesses: Vec<UserId>,
    top_children: ChildList,
    task_updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Owning company.
    pub company: CompanyId,
    /// Display title; trimmed on creation.
    pub title: String,
    /// Managing user.
    pub manager: UserId,
    /// Users granted access besides the manager.
    pub accesses: Vec<UserId>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted owning company.
    pub company: CompanyId,
    /// Persisted title.
    pub title: String,
    /// Persisted manager.
    pub manager: UserId,
    /// Persisted access grants.
    pub accesses: Vec<UserId>,
    /// Persisted top-level task order.
    pub top_children: ChildList,
    /// Persisted latest task activity timestamp.
    pub task_updated_at: Option<DateTime<Utc>>,
    /// Persisted soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project.
    ///
    /// The manager is always granted access and is listed first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyTitle`] when the title is blank.
    pub fn new(data: NewProject, clock: &impl Clock) -> Result<Self, ProjectDomainError> {
        let title = normalize_title(&data.title)?;
        let timestamp = clock.utc();
        let mut accesses = vec![data.manager];
        extend_unique(&mut accesses, data.accesses);

        Ok(Self {
            id: ProjectId::new(),
            company: data.company,
            title,
            manager: data.manager,
            accesses,
            top_children: ChildList::new(),
            task_updated_at: None,
            deleted_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            company: data.company,
            title: data.title,
            manager: data.manager,
            accesses: data.accesses,
            top_children: data.top_children,
            task_updated_at: data.task_updated_at,
            deleted_at: data.deleted_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company(&self) -> CompanyId {
        self.company
    }

    /// Returns the project title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the managing user.
    #[must_use]
    pub const fn manager(&self) -> UserId {
        self.manager
    }

    /// Returns the users granted access.
    #[must_use]
    pub fn accesses(&self) -> &[UserId] {
        &self.accesses
    }

    /// Returns the ordered top-level tasks.
    #[must_use]
    pub const fn top_children(&self) -> &ChildList {
        &self.top_children
    }

    /// Returns when a task of this project last changed.
    #[must_use]
    pub const fn task_updated_at(&self) -> Option<DateTime<Utc>> {
        self.task_updated_at
    }

    /// Returns the soft-deletion timestamp, if deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` when the project is soft-deleted.
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

    /// Returns `true` when `user` manages the project.
    #[must_use]
    pub fn is_managed_by(&self, user: UserId) -> bool {
        self.manager == user
    }

    /// Returns `true` when `user` is the manager or holds an access grant.
    #[must_use]
    pub fn grants_access_to(&self, user: UserId) -> bool {
        self.is_managed_by(user) || self.accesses.contains(&user)
    }

    /// Changes the project title.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyTitle`] when the title is blank.
    pub fn rename(&mut self, title: &str, clock: &impl Clock) -> Result<(), ProjectDomainError> {
        self.title = normalize_title(title)?;
        self.touch(clock);
        Ok(())
    }

    /// Grants access to the given users, skipping existing grants.
    pub fn grant_access(&mut self, users: impl IntoIterator<Item = UserId>, clock: &impl Clock) {
        extend_unique(&mut self.accesses, users);
        self.touch(clock);
    }

    /// Revokes access from the given users. The manager keeps access.
    pub fn revoke_access(&mut self, users: &[UserId], clock: &impl Clock) {
        let manager = self.manager;
        self.accesses
            .retain(|user| *user == manager || !users.contains(user));
        self.touch(clock);
    }

    /// Adds a task to the top-level list at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::UnknownSibling`] without changing the list
    /// when `position` names an absent sibling.
    pub fn add_top_child(
        &mut self,
        child: TaskId,
        position: Position,
    ) -> Result<usize, OrderingError> {
        self.top_children.place(child, position)
    }

    /// Removes a task from the top-level list.
    pub fn remove_top_child(&mut self, child: TaskId) -> bool {
        self.top_children.remove(child)
    }

    /// Repositions a task already in the top-level list.
    ///
    /// Returns `Ok(None)` when the task is not a top-level child.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::UnknownSibling`] without changing the list
    /// when `position` names an absent sibling.
    pub fn sort_top_child(
        &mut self,
        child: TaskId,
        position: Position,
    ) -> Result<Option<usize>, OrderingError> {
        self.top_children.reposition(child, position)
    }

    /// Records task activity at `at`.
    pub const fn record_task_activity(&mut self, at: DateTime<Utc>) {
        self.task_updated_at = Some(at);
    }

    /// Soft-deletes the project. Returns `false` when already deleted.
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

    /// Replaces the top-level list wholesale, as stored by a list write.
    pub(crate) fn replace_top_children(&mut self, children: ChildList) {
        self.top_children = children;
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn normalize_title(title: &str) -> Result<String, ProjectDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ProjectDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn extend_unique(target: &mut Vec<UserId>, users: impl IntoIterator<Item = UserId>) {
    for user in users {
        if !target.contains(&user) {
            target.push(user);
        }
    }
}
