//! Application services for the task tree.
//!
//! [`TaskTreeService`] is split across files by concern: entity lifecycle
//! (`tree`), reparenting (`moves`), and comments (`comments`).

mod comments;
mod error;
mod moves;
mod requests;
mod tree;
mod view;

pub use error::{PositionError, TaskTreeError, TaskTreeResult};
pub use requests::{
    CreateCommentRequest, CreateTaskRequest, MoveChildRequest, UpdateCommentRequest,
};
pub use tree::{TaskTreeService, ensure_is_author};
pub use view::{MoveOutcome, Owner, TaskDetails, TaskNode};
