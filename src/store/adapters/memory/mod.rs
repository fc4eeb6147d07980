//! In-memory store for service tests and local runs.
//!
//! A commit applies its writes to a copy of the current state and swaps the
//! copy in only when every write succeeded, so readers never observe a
//! partially applied unit.

use crate::{
    error::EntityRef,
    identity::CompanyId,
    project::{
        domain::{Project, ProjectId},
        ports::ProjectRepository,
    },
    store::{AtomicWriter, DeletedFilter, StagedWrite, StoreError, StoreResult, UnitOfWork},
    task::{
        domain::{CommentId, Task, TaskComment, TaskId},
        ports::{CommentRepository, TaskRepository},
    },
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    fmt::Display,
    sync::{Arc, Mutex, RwLock},
};

/// Thread-safe in-memory implementation of every store port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTreeStore {
    state: Arc<RwLock<TreeState>>,
    fault: Arc<Mutex<Option<usize>>>,
}

#[derive(Debug, Clone, Default)]
struct TreeState {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<CommentId, TaskComment>,
}

impl InMemoryTreeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next commit fail when it reaches the write at `index`.
    ///
    /// The writes before `index` are applied to the commit's working copy
    /// and then discarded, so the failure exercises rollback rather than
    /// early rejection. The fault fires once.
    pub fn fail_write_at(&self, index: usize) {
        if let Ok(mut fault) = self.fault.lock() {
            *fault = Some(index);
        }
    }

    /// Returns the number of stored tasks, deleted ones included.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.state.read().map_or(0, |state| state.tasks.len())
    }

    /// Returns the number of stored comments, deleted ones included.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.state.read().map_or(0, |state| state.comments.len())
    }

    fn read_state(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, TreeState>> {
        self.state.read().map_err(poisoned)
    }

    fn take_fault(&self) -> StoreResult<Option<usize>> {
        Ok(self.fault.lock().map_err(poisoned)?.take())
    }
}

fn poisoned(err: impl Display) -> StoreError {
    StoreError::persistence(std::io::Error::other(err.to_string()))
}

fn admitted<T: Clone>(item: Option<&T>, filter: DeletedFilter, is_deleted: fn(&T) -> bool) -> Option<T> {
    item.filter(|found| filter.admits(is_deleted(found))).cloned()
}

impl TreeState {
    fn project_mut(&mut self, id: ProjectId) -> StoreResult<&mut Project> {
        self.projects
            .get_mut(&id)
            .ok_or(StoreError::Missing(EntityRef::Project(id)))
    }

    fn task_mut(&mut self, id: TaskId) -> StoreResult<&mut Task> {
        self.tasks
            .get_mut(&id)
            .ok_or(StoreError::Missing(EntityRef::Task(id)))
    }

    fn apply(&mut self, write: StagedWrite) -> StoreResult<()> {
        match write {
            StagedWrite::InsertProject(project) => {
                if self.projects.contains_key(&project.id()) {
                    return Err(StoreError::Duplicate(project.id().into()));
                }
                self.projects.insert(project.id(), project);
            }
            StagedWrite::SaveProject(mut project) => {
                let stored = self.project_mut(project.id())?;
                project.replace_top_children(stored.top_children().clone());
                *stored = project;
            }
            StagedWrite::SetTopChildren { project, children } => {
                self.project_mut(project)?.replace_top_children(children);
            }
            StagedWrite::TouchProject { project, at } => {
                self.project_mut(project)?.record_task_activity(at);
            }
            StagedWrite::InsertTask(task) => {
                if self.tasks.contains_key(&task.id()) {
                    return Err(StoreError::Duplicate(task.id().into()));
                }
                self.tasks.insert(task.id(), task);
            }
            StagedWrite::SaveTask(mut task) => {
                let stored = self.task_mut(task.id())?;
                task.replace_children(stored.children().clone());
                *stored = task;
            }
            StagedWrite::SetChildren { task, children } => {
                self.task_mut(task)?.replace_children(children);
            }
            StagedWrite::InsertComment(comment) => {
                if self.comments.contains_key(&comment.id()) {
                    return Err(StoreError::Duplicate(comment.id().into()));
                }
                self.comments.insert(comment.id(), comment);
            }
            StagedWrite::SaveComment(comment) => {
                let stored = self
                    .comments
                    .get_mut(&comment.id())
                    .ok_or(StoreError::Missing(comment.id().into()))?;
                *stored = comment;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryTreeStore {
    async fn find_project(
        &self,
        id: ProjectId,
        filter: DeletedFilter,
    ) -> StoreResult<Option<Project>> {
        let state = self.read_state()?;
        Ok(admitted(state.projects.get(&id), filter, Project::is_deleted))
    }

    async fn find_projects_by_company(
        &self,
        company: CompanyId,
        filter: DeletedFilter,
    ) -> StoreResult<Vec<Project>> {
        let state = self.read_state()?;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|project| project.company() == company && filter.admits(project.is_deleted()))
            .cloned()
            .collect();
        projects.sort_by_key(|project| (project.created_at(), project.id()));
        Ok(projects)
    }
}

#[async_trait]
impl TaskRepository for InMemoryTreeStore {
    async fn find_task(&self, id: TaskId, filter: DeletedFilter) -> StoreResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(admitted(state.tasks.get(&id), filter, Task::is_deleted))
    }

    async fn find_tasks(&self, ids: &[TaskId], filter: DeletedFilter) -> StoreResult<Vec<Task>> {
        let state = self.read_state()?;
        Ok(ids
            .iter()
            .filter_map(|id| admitted(state.tasks.get(id), filter, Task::is_deleted))
            .collect())
    }

    async fn find_tasks_by_project(
        &self,
        project: ProjectId,
        filter: DeletedFilter,
    ) -> StoreResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project() == project && filter.admits(task.is_deleted()))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }
}

#[async_trait]
impl CommentRepository for InMemoryTreeStore {
    async fn find_comment(
        &self,
        id: CommentId,
        filter: DeletedFilter,
    ) -> StoreResult<Option<TaskComment>> {
        let state = self.read_state()?;
        Ok(admitted(state.comments.get(&id), filter, TaskComment::is_deleted))
    }

    async fn find_comments(
        &self,
        ids: &[CommentId],
        filter: DeletedFilter,
    ) -> StoreResult<Vec<TaskComment>> {
        let state = self.read_state()?;
        Ok(ids
            .iter()
            .filter_map(|id| admitted(state.comments.get(id), filter, TaskComment::is_deleted))
            .collect())
    }
}

#[async_trait]
impl AtomicWriter for InMemoryTreeStore {
    async fn commit(&self, unit: UnitOfWork) -> StoreResult<()> {
        let fault = self.take_fault()?;
        let mut state = self.state.write().map_err(poisoned)?;
        let mut working = state.clone();

        for (index, write) in unit.into_writes().into_iter().enumerate() {
            if fault == Some(index) {
                return Err(StoreError::persistence(std::io::Error::other(format!(
                    "injected failure at write {index}"
                ))));
            }
            working.apply(write)?;
        }

        *state = working;
        Ok(())
    }
}
