//! Staged writes that commit together.

use super::StoreResult;
use crate::{
    ordering::ChildList,
    project::domain::{Project, ProjectId},
    task::domain::{Task, TaskComment, TaskId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A single document write waiting for commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedWrite {
    /// Inserts a new project document.
    InsertProject(Project),
    /// Replaces every project field except `top_children`.
    SaveProject(Project),
    /// Replaces a project's ordered top-level task list.
    SetTopChildren {
        /// Owning project.
        project: ProjectId,
        /// New top-level order.
        children: ChildList,
    },
    /// Bumps a project's `task_updated_at` timestamp.
    TouchProject {
        /// Project to bump.
        project: ProjectId,
        /// New timestamp.
        at: DateTime<Utc>,
    },
    /// Inserts a new task document, children included.
    InsertTask(Task),
    /// Replaces every task field except `children`.
    SaveTask(Task),
    /// Replaces a task's ordered children list.
    SetChildren {
        /// Owning task.
        task: TaskId,
        /// New children order.
        children: ChildList,
    },
    /// Inserts a new comment document.
    InsertComment(TaskComment),
    /// Replaces a comment document.
    SaveComment(TaskComment),
}

/// Ordered set of writes that must all apply or all be discarded.
///
/// Ordered lists are written through dedicated list writes rather than the
/// entity saves, so an entity save never clobbers a list it did not change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOfWork {
    writes: Vec<StagedWrite>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    #[must_use]
    pub const fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// Stages an arbitrary write.
    pub fn stage(&mut self, write: StagedWrite) -> &mut Self {
        self.writes.push(write);
        self
    }

    /// Stages the insertion of a new project.
    pub fn insert_project(&mut self, project: Project) -> &mut Self {
        self.stage(StagedWrite::InsertProject(project))
    }

    /// Stages a project field update.
    pub fn save_project(&mut self, project: Project) -> &mut Self {
        self.stage(StagedWrite::SaveProject(project))
    }

    /// Stages a replacement of a project's top-level list.
    pub fn set_top_children(&mut self, project: ProjectId, children: ChildList) -> &mut Self {
        self.stage(StagedWrite::SetTopChildren { project, children })
    }

    /// Stages a `task_updated_at` bump.
    pub fn touch_project(&mut self, project: ProjectId, at: DateTime<Utc>) -> &mut Self {
        self.stage(StagedWrite::TouchProject { project, at })
    }

    /// Stages the insertion of a new task.
    pub fn insert_task(&mut self, task: Task) -> &mut Self {
        self.stage(StagedWrite::InsertTask(task))
    }

    /// Stages a task field update.
    pub fn save_task(&mut self, task: Task) -> &mut Self {
        self.stage(StagedWrite::SaveTask(task))
    }

    /// Stages a replacement of a task's children list.
    pub fn set_children(&mut self, task: TaskId, children: ChildList) -> &mut Self {
        self.stage(StagedWrite::SetChildren { task, children })
    }

    /// Stages the insertion of a new comment.
    pub fn insert_comment(&mut self, comment: TaskComment) -> &mut Self {
        self.stage(StagedWrite::InsertComment(comment))
    }

    /// Stages a comment update.
    pub fn save_comment(&mut self, comment: TaskComment) -> &mut Self {
        self.stage(StagedWrite::SaveComment(comment))
    }

    /// Returns the number of staged writes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns `true` when nothing has been staged.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Returns the staged writes in commit order.
    #[must_use]
    pub fn writes(&self) -> &[StagedWrite] {
        &self.writes
    }

    /// Consumes the unit, returning its writes in commit order.
    #[must_use]
    pub fn into_writes(self) -> Vec<StagedWrite> {
        self.writes
    }
}

/// Commit port for units of work.
#[async_trait]
pub trait AtomicWriter: Send + Sync {
    /// Applies every write in `unit` in order, or none of them.
    ///
    /// No write of the unit may be visible to other readers before the
    /// whole unit has been applied.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::Missing`] when a write targets an absent
    /// document, [`super::StoreError::Duplicate`] when an insert collides,
    /// and [`super::StoreError::Persistence`] for infrastructure failures.
    /// In every case nothing from the unit has been applied.
    async fn commit(&self, unit: UnitOfWork) -> StoreResult<()>;
}
