//! Persistence boundary shared by the project and task contexts.
//!
//! Reads go through the per-context repository ports. Every write is staged
//! into a [`UnitOfWork`] and committed through the [`AtomicWriter`] port, so
//! a multi-document change (for example a task leaving one parent's
//! children for another's) is applied completely or not at all.
//! [`TransactionalMover`] draws that boundary for the services.
//!
//! - Port contracts and units of work in this module
//! - Adapter implementations in [`adapters`]

pub mod adapters;
mod error;
mod mover;
mod unit_of_work;

pub use error::{StoreError, StoreResult, TransactionAborted};
pub use mover::TransactionalMover;
pub use unit_of_work::{AtomicWriter, StagedWrite, UnitOfWork};

use crate::{
    project::ports::ProjectRepository,
    task::ports::{CommentRepository, TaskRepository},
};

/// Whether soft-deleted documents take part in a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeletedFilter {
    /// Only live documents.
    #[default]
    Exclude,
    /// Live and soft-deleted documents alike.
    Include,
}

impl DeletedFilter {
    /// Returns `true` when a document with the given deletion state passes.
    #[must_use]
    pub const fn admits(self, is_deleted: bool) -> bool {
        match self {
            Self::Exclude => !is_deleted,
            Self::Include => true,
        }
    }
}

/// Full store contract needed by the task tree.
pub trait TreeStore:
    ProjectRepository + TaskRepository + CommentRepository + AtomicWriter
{
}

impl<T> TreeStore for T where
    T: ProjectRepository + TaskRepository + CommentRepository + AtomicWriter
{
}
