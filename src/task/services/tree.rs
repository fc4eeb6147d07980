//! Task lifecycle operations: creation, lookup, patching, soft deletion.

use super::{
    CreateTaskRequest, Owner, TaskDetails, TaskNode, TaskTreeError, TaskTreeResult,
};
use crate::{
    identity::UserId,
    ordering::{ChildList, Position},
    project::{
        domain::{Project, ProjectId},
        ports::AccessGate,
        services::ProjectService,
    },
    store::{DeletedFilter, TransactionalMover, TreeStore},
    task::domain::{NewTask, Task, TaskId, TaskPatch},
};
use mockable::Clock;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// Task tree orchestration service.
///
/// Every mutation is authorised first: project access for creation,
/// updates, and moves; authorship for deletion and restoration. Failed
/// checks surface as [`TaskTreeError::NotFound`] so that callers cannot
/// tell restricted resources from absent ones.
pub struct TaskTreeService<S, G, C>
where
    S: TreeStore,
    G: AccessGate,
    C: Clock + Send + Sync,
{
    pub(super) store: Arc<S>,
    pub(super) gate: Arc<G>,
    pub(super) projects: ProjectService<S, C>,
    pub(super) mover: TransactionalMover<S>,
    pub(super) clock: Arc<C>,
}

impl<S, G, C> Clone for TaskTreeService<S, G, C>
where
    S: TreeStore,
    G: AccessGate,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            gate: Arc::clone(&self.gate),
            projects: self.projects.clone(),
            mover: self.mover.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, G, C> TaskTreeService<S, G, C>
where
    S: TreeStore,
    G: AccessGate,
    C: Clock + Send + Sync,
{
    /// Creates a new task tree service.
    #[must_use]
    pub fn new(store: Arc<S>, gate: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock)),
            mover: TransactionalMover::new(Arc::clone(&store)),
            store,
            gate,
            clock,
        }
    }

    /// Creates a task at the requested position of its owner list.
    ///
    /// The task insert and the owner list update commit together.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the project is inaccessible
    /// or the parent is absent or belongs to another project,
    /// [`TaskTreeError::InvalidPosition`] when the position names an absent
    /// sibling, and [`TaskTreeError::TransactionAborted`] when the commit
    /// fails.
    pub async fn create(
        &self,
        requester: UserId,
        request: CreateTaskRequest,
    ) -> TaskTreeResult<TaskDetails> {
        let CreateTaskRequest {
            project,
            parent,
            position,
            title,
            content,
            deadline,
            involved_users,
        } = request;
        let accessible = self.ensure_can_access(requester, project).await?;

        let mut owner = match parent {
            Some(parent_id) => {
                let parent_task = self.load_live_task(parent_id).await?;
                if parent_task.project() != project {
                    return Err(TaskTreeError::not_found(parent_id));
                }
                Owner::Parent(parent_task)
            }
            None => Owner::TopLevel(accessible),
        };

        let task = Task::new(
            NewTask {
                project,
                author: requester,
                parent,
                title,
                content,
                deadline,
                involved_users,
            },
            &*self.clock,
        )?;
        let task_id = task.id();

        self.mover
            .run_atomic("create_task", |unit| -> TaskTreeResult<()> {
                owner.place_child(task_id, position)?;
                unit.insert_task(task);
                owner.stage_list(unit);
                Ok(())
            })
            .await?;
        tracing::debug!(task = %task_id, %project, parent = ?parent, "task created");

        self.record_activity(&[project]).await;
        self.get_by_id(task_id).await
    }

    /// Loads a live task with its relations expanded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the task is absent or
    /// deleted.
    pub async fn get_by_id(&self, id: TaskId) -> TaskTreeResult<TaskDetails> {
        let task = self.load_live_task(id).await?;
        self.expand(task).await
    }

    /// Loads a live task the requester may see, with relations expanded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the task is absent, deleted,
    /// or its project is not accessible to `requester`.
    pub async fn get_by_id_with_access_check(
        &self,
        id: TaskId,
        requester: UserId,
    ) -> TaskTreeResult<TaskDetails> {
        let task = self.load_live_task(id).await?;
        self.ensure_task_access(requester, &task).await?;
        self.expand(task).await
    }

    /// Applies a partial field update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the task is absent or its
    /// project inaccessible, and [`TaskTreeError::Domain`] for a blank
    /// title.
    pub async fn update(
        &self,
        requester: UserId,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskTreeResult<TaskDetails> {
        let mut task = self.load_live_task(id).await?;
        self.ensure_task_access(requester, &task).await?;

        if task.apply_patch(patch, &*self.clock)? {
            let project = task.project();
            self.mover
                .run_atomic("update_task", |unit| -> TaskTreeResult<()> {
                    unit.save_task(task);
                    Ok(())
                })
                .await?;
            self.record_activity(&[project]).await;
        }
        self.get_by_id(id).await
    }

    /// Soft-deletes a task and takes it out of its owner list.
    ///
    /// Only the author may delete a task; project access is not enough.
    /// The task keeps its own children so they return with it on restore.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the task is absent, already
    /// deleted, or not authored by `requester`.
    pub async fn remove(&self, requester: UserId, id: TaskId) -> TaskTreeResult<TaskId> {
        let mut task = self.load_live_task(id).await?;
        ensure_is_author(&task, requester)?;
        let mut owner = self.current_owner(&task).await?;
        let project = task.project();
        let clock = &*self.clock;

        self.mover
            .run_atomic("remove_task", |unit| -> TaskTreeResult<()> {
                task.mark_deleted(clock);
                if let Some(list_owner) = owner.as_mut() {
                    if list_owner.remove_child(id) {
                        list_owner.stage_list(unit);
                    }
                }
                unit.save_task(task);
                Ok(())
            })
            .await?;
        tracing::debug!(task = %id, "task removed");

        self.record_activity(&[project]).await;
        Ok(id)
    }

    /// Restores a soft-deleted task to the end of its owner list.
    ///
    /// When the former parent is gone the task comes back as a top-level
    /// task of its project. Restoring a live task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the task is absent, not
    /// authored by `requester`, or its project is deleted.
    pub async fn restore(&self, requester: UserId, id: TaskId) -> TaskTreeResult<TaskId> {
        let mut task = self
            .store
            .find_task(id, DeletedFilter::Include)
            .await?
            .ok_or_else(|| TaskTreeError::not_found(id))?;
        ensure_is_author(&task, requester)?;
        if !task.is_deleted() {
            return Ok(id);
        }

        let live_parent = match task.parent() {
            Some(parent_id) => self
                .store
                .find_task(parent_id, DeletedFilter::Exclude)
                .await?
                .filter(|parent| parent.project() == task.project()),
            None => None,
        };
        let mut owner = match live_parent {
            Some(parent) => Owner::Parent(parent),
            None => Owner::TopLevel(
                self.store
                    .find_project(task.project(), DeletedFilter::Exclude)
                    .await?
                    .ok_or_else(|| TaskTreeError::not_found(id))?,
            ),
        };
        let project = task.project();
        let clock = &*self.clock;

        self.mover
            .run_atomic("restore_task", |unit| -> TaskTreeResult<()> {
                owner.place_child(id, Position::Last)?;
                task.restore(clock);
                if task.parent() != owner.parent_id() {
                    task.attach_to(owner.parent_id(), clock);
                }
                owner.stage_list(unit);
                unit.save_task(task);
                Ok(())
            })
            .await?;
        tracing::debug!(task = %id, "task restored");

        self.record_activity(&[project]).await;
        Ok(id)
    }

    /// Returns the live task tree of a project in display order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the project is inaccessible.
    pub async fn project_tree(
        &self,
        requester: UserId,
        project: ProjectId,
    ) -> TaskTreeResult<Vec<TaskNode>> {
        let accessible = self.ensure_can_access(requester, project).await?;
        let tasks: HashMap<TaskId, Task> = self
            .store
            .find_tasks_by_project(project, DeletedFilter::Exclude)
            .await?
            .into_iter()
            .map(|task| (task.id(), task))
            .collect();
        let mut visited = HashSet::new();
        Ok(build_nodes(accessible.top_children(), &tasks, &mut visited))
    }

    /// Fails with [`TaskTreeError::NotFound`] unless `requester` may access
    /// `project`; returns the project otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] for absent and inaccessible
    /// projects alike.
    pub async fn ensure_can_access(
        &self,
        requester: UserId,
        project: ProjectId,
    ) -> TaskTreeResult<Project> {
        Ok(self.gate.can_access_project(requester, project).await?)
    }

    /// Checks project access for a task, reporting failure as the task
    /// being absent.
    pub(super) async fn ensure_task_access(
        &self,
        requester: UserId,
        task: &Task,
    ) -> TaskTreeResult<Project> {
        match self.ensure_can_access(requester, task.project()).await {
            Err(TaskTreeError::NotFound(_)) => Err(TaskTreeError::not_found(task.id())),
            other => other,
        }
    }

    pub(super) async fn load_live_task(&self, id: TaskId) -> TaskTreeResult<Task> {
        self.store
            .find_task(id, DeletedFilter::Exclude)
            .await?
            .ok_or_else(|| TaskTreeError::not_found(id))
    }

    /// Bumps `task_updated_at` on each project. Failures are logged only:
    /// the triggering change has already committed.
    pub(super) async fn record_activity(&self, projects: &[ProjectId]) {
        let mut seen = HashSet::new();
        for project in projects.iter().copied().filter(|id| seen.insert(*id)) {
            if let Err(err) = self.projects.update_task_updated_at(project).await {
                tracing::warn!(%project, error = %err, "failed to record task activity");
            }
        }
    }

    async fn current_owner(&self, task: &Task) -> TaskTreeResult<Option<Owner>> {
        let owner = match task.parent() {
            Some(parent) => self
                .store
                .find_task(parent, DeletedFilter::Include)
                .await?
                .map(Owner::Parent),
            None => self
                .store
                .find_project(task.project(), DeletedFilter::Include)
                .await?
                .map(Owner::TopLevel),
        };
        Ok(owner)
    }

    async fn expand(&self, task: Task) -> TaskTreeResult<TaskDetails> {
        let project = self
            .store
            .find_project(task.project(), DeletedFilter::Include)
            .await?
            .ok_or_else(|| TaskTreeError::not_found(task.project()))?;
        let children = self
            .store
            .find_tasks(task.children().as_slice(), DeletedFilter::Exclude)
            .await?;
        let comments = self
            .store
            .find_comments(task.comments(), DeletedFilter::Exclude)
            .await?;

        Ok(TaskDetails {
            task,
            project,
            children,
            comments,
        })
    }
}

/// Fails with [`TaskTreeError::NotFound`] unless `user` authored `task`.
///
/// # Errors
///
/// Returns [`TaskTreeError::NotFound`] rather than a forbidden error so
/// that ownership failures do not reveal existence.
pub fn ensure_is_author(task: &Task, user: UserId) -> TaskTreeResult<()> {
    if task.is_authored_by(user) {
        Ok(())
    } else {
        Err(TaskTreeError::not_found(task.id()))
    }
}

fn build_nodes(
    list: &ChildList,
    tasks: &HashMap<TaskId, Task>,
    visited: &mut HashSet<TaskId>,
) -> Vec<TaskNode> {
    let mut nodes = Vec::with_capacity(list.len());
    for id in list.iter() {
        if !visited.insert(id) {
            continue;
        }
        let Some(task) = tasks.get(&id) else {
            continue;
        };
        nodes.push(TaskNode {
            children: build_nodes(task.children(), tasks, visited),
            task: task.clone(),
        });
    }
    nodes
}
