//! Reparenting and reordering of tasks.

use super::{
    MoveChildRequest, MoveOutcome, Owner, PositionError, TaskTreeError, TaskTreeResult,
    TaskTreeService,
};
use crate::{
    identity::UserId,
    ordering::Position,
    project::{domain::Project, ports::AccessGate},
    store::{DeletedFilter, TreeStore},
    task::domain::{Task, TaskId},
};
use mockable::Clock;
use std::collections::{HashSet, VecDeque};

impl<S, G, C> TaskTreeService<S, G, C>
where
    S: TreeStore,
    G: AccessGate,
    C: Clock + Send + Sync,
{
    /// Moves a task between owner lists, or reorders it within one.
    ///
    /// `from_parent` must be the task's current parent (`None` when it is a
    /// top-level task). Every list and task write of the move commits in a
    /// single unit of work: either the task ends up in exactly the
    /// destination list at the requested position, or nothing changes. A
    /// move into a parent of another project takes the whole subtree along.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTreeError::NotFound`] when the task or either parent is
    /// absent or inaccessible, or the task is not in the named source;
    /// [`TaskTreeError::InvalidPosition`] when the position names an absent
    /// sibling or the destination lies inside the moved subtree; and
    /// [`TaskTreeError::TransactionAborted`] when the commit fails.
    pub async fn move_child(
        &self,
        requester: UserId,
        request: MoveChildRequest,
    ) -> TaskTreeResult<MoveOutcome> {
        let MoveChildRequest {
            child: child_id,
            from_parent,
            to_parent,
            position,
        } = request;
        let child = self.load_live_task(child_id).await?;
        if child.parent() != from_parent {
            return Err(TaskTreeError::not_found(child_id));
        }
        let home = self.ensure_task_access(requester, &child).await?;

        match (from_parent, to_parent) {
            (None, None) => self.reorder_top_level(child, home, position).await,
            (Some(from), Some(to)) if from == to => {
                let parent = self.load_parent(requester, from).await?;
                self.reorder_within_parent(child, parent, position).await
            }
            (Some(from), Some(to)) => {
                let source = self.load_parent(requester, from).await?;
                let destination = self.load_parent(requester, to).await?;
                self.ensure_not_descendant(child_id, &destination).await?;
                self.transfer(
                    child,
                    Owner::Parent(source),
                    Owner::Parent(destination),
                    position,
                )
                .await
            }
            (None, Some(to)) => {
                let destination = self.load_parent(requester, to).await?;
                self.ensure_not_descendant(child_id, &destination).await?;
                self.transfer(
                    child,
                    Owner::TopLevel(home),
                    Owner::Parent(destination),
                    position,
                )
                .await
            }
            (Some(from), None) => {
                let source = self.load_parent(requester, from).await?;
                self.transfer(child, Owner::Parent(source), Owner::TopLevel(home), position)
                    .await
            }
        }
    }

    async fn reorder_top_level(
        &self,
        child: Task,
        project: Project,
        position: Position,
    ) -> TaskTreeResult<MoveOutcome> {
        let child_id = child.id();
        if !project.top_children().contains(child_id) {
            return Err(TaskTreeError::not_found(child_id));
        }
        let project = self
            .projects
            .sort_top_child(project.id(), child_id, position)
            .await?;
        self.record_activity(&[project.id()]).await;

        let child = self.load_live_task(child_id).await?;
        Ok(MoveOutcome {
            child,
            source: Owner::TopLevel(project.clone()),
            destination: Owner::TopLevel(project),
        })
    }

    async fn reorder_within_parent(
        &self,
        child: Task,
        mut parent: Task,
        position: Position,
    ) -> TaskTreeResult<MoveOutcome> {
        let child_id = child.id();
        if !parent.children().contains(child_id) {
            return Err(TaskTreeError::not_found(child_id));
        }
        self.mover
            .run_atomic("reorder_children", |unit| -> TaskTreeResult<()> {
                if parent.sort_child(child_id, position)?.is_some() {
                    unit.set_children(parent.id(), parent.children().clone());
                }
                Ok(())
            })
            .await?;
        self.record_activity(&[parent.project()]).await;

        let owner = self.reload_owner(&Owner::Parent(parent)).await?;
        Ok(MoveOutcome {
            child: self.load_live_task(child_id).await?,
            source: owner.clone(),
            destination: owner,
        })
    }

    async fn transfer(
        &self,
        mut child: Task,
        mut source: Owner,
        mut destination: Owner,
        position: Position,
    ) -> TaskTreeResult<MoveOutcome> {
        let child_id = child.id();
        if !source.children().contains(child_id) {
            return Err(TaskTreeError::not_found(child_id));
        }
        let origin = child.project();
        let target = destination.project_id();
        let mut subtree = if origin == target {
            Vec::new()
        } else {
            self.collect_subtree(&child).await?
        };
        let new_parent = destination.parent_id();
        let clock = &*self.clock;

        self.mover
            .run_atomic("move_task", |unit| -> TaskTreeResult<()> {
                destination.place_child(child_id, position)?;
                source.remove_child(child_id);
                child.attach_to(new_parent, clock);
                if origin != target {
                    child.rehome(target, clock);
                    for descendant in &mut subtree {
                        descendant.rehome(target, clock);
                        unit.save_task(descendant.clone());
                    }
                }
                source.stage_list(unit);
                destination.stage_list(unit);
                unit.save_task(child);
                Ok(())
            })
            .await?;
        tracing::debug!(
            task = %child_id,
            from = ?source.parent_id(),
            to = ?new_parent,
            rehomed = subtree.len(),
            "task moved"
        );

        self.record_activity(&[origin, target]).await;
        Ok(MoveOutcome {
            child: self.load_live_task(child_id).await?,
            source: self.reload_owner(&source).await?,
            destination: self.reload_owner(&destination).await?,
        })
    }

    async fn load_parent(&self, requester: UserId, id: TaskId) -> TaskTreeResult<Task> {
        let parent = self.load_live_task(id).await?;
        self.ensure_task_access(requester, &parent).await?;
        Ok(parent)
    }

    /// Rejects destinations equal to `child` or below it.
    async fn ensure_not_descendant(&self, child: TaskId, destination: &Task) -> TaskTreeResult<()> {
        let cycle = PositionError::Cycle {
            child,
            destination: destination.id(),
        };
        if destination.id() == child {
            return Err(cycle.into());
        }

        let mut visited = HashSet::from([destination.id()]);
        let mut next = destination.parent();
        while let Some(ancestor) = next {
            if ancestor == child {
                return Err(cycle.into());
            }
            if !visited.insert(ancestor) {
                break;
            }
            next = self
                .store
                .find_task(ancestor, DeletedFilter::Include)
                .await?
                .and_then(|task| task.parent());
        }
        Ok(())
    }

    /// Loads every descendant of `root`, deleted ones included.
    async fn collect_subtree(&self, root: &Task) -> TaskTreeResult<Vec<Task>> {
        let mut visited = HashSet::from([root.id()]);
        let mut pending: VecDeque<TaskId> = root.children().iter().collect();
        let mut subtree = Vec::new();

        while !pending.is_empty() {
            let batch: Vec<TaskId> = pending
                .drain(..)
                .filter(|id| visited.insert(*id))
                .collect();
            if batch.is_empty() {
                break;
            }
            for task in self.store.find_tasks(&batch, DeletedFilter::Include).await? {
                pending.extend(task.children().iter());
                subtree.push(task);
            }
        }
        Ok(subtree)
    }

    async fn reload_owner(&self, owner: &Owner) -> TaskTreeResult<Owner> {
        let reloaded = match owner {
            Owner::Parent(task) => self
                .store
                .find_task(task.id(), DeletedFilter::Include)
                .await?
                .map(Owner::Parent)
                .ok_or_else(|| TaskTreeError::not_found(task.id()))?,
            Owner::TopLevel(project) => self
                .store
                .find_project(project.id(), DeletedFilter::Include)
                .await?
                .map(Owner::TopLevel)
                .ok_or_else(|| TaskTreeError::not_found(project.id()))?,
        };
        Ok(reloaded)
    }
}
