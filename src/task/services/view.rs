//! Read models returned by task tree operations.

use crate::{
    ordering::{ChildList, OrderingError, Position},
    project::domain::{Project, ProjectId},
    store::UnitOfWork,
    task::domain::{Task, TaskComment, TaskId},
};

/// A task with its relations expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// The task itself.
    pub task: Task,
    /// Owning project.
    pub project: Project,
    /// Live children in display order.
    pub children: Vec<Task>,
    /// Live comments in posting order.
    pub comments: Vec<TaskComment>,
}

/// A live task with its live descendants, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    /// The task itself.
    pub task: Task,
    /// Child nodes in display order.
    pub children: Vec<TaskNode>,
}

/// Owner of the ordered list a task sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// A parent task's children list.
    Parent(Task),
    /// A project's top-level list.
    TopLevel(Project),
}

impl Owner {
    /// Returns the owner's ordered list.
    #[must_use]
    pub const fn children(&self) -> &ChildList {
        match self {
            Self::Parent(task) => task.children(),
            Self::TopLevel(project) => project.top_children(),
        }
    }

    /// Returns the project the list belongs to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        match self {
            Self::Parent(task) => task.project(),
            Self::TopLevel(project) => project.id(),
        }
    }

    /// Returns the parent a member of this list points at.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        match self {
            Self::Parent(task) => Some(task.id()),
            Self::TopLevel(_) => None,
        }
    }

    pub(super) fn place_child(
        &mut self,
        child: TaskId,
        position: Position,
    ) -> Result<usize, OrderingError> {
        match self {
            Self::Parent(task) => task.add_child(child, position),
            Self::TopLevel(project) => project.add_top_child(child, position),
        }
    }

    pub(super) fn remove_child(&mut self, child: TaskId) -> bool {
        match self {
            Self::Parent(task) => task.remove_child(child),
            Self::TopLevel(project) => project.remove_top_child(child),
        }
    }

    /// Stages the current list as a list write.
    pub(super) fn stage_list(&self, unit: &mut UnitOfWork) {
        match self {
            Self::Parent(task) => unit.set_children(task.id(), task.children().clone()),
            Self::TopLevel(project) => {
                unit.set_top_children(project.id(), project.top_children().clone())
            }
        };
    }
}

/// Reloaded state after a successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The moved task.
    pub child: Task,
    /// The list the task left.
    pub source: Owner,
    /// The list the task joined; equal to `source` for reorders.
    pub destination: Owner,
}
