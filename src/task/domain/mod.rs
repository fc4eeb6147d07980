//! Domain model for tasks and task comments.
//!
//! Tasks and comments are plain aggregates; ordering lives in
//! [`crate::ordering::ChildList`] and all infrastructure concerns stay
//! outside of the domain boundary.

mod comment;
mod error;
mod ids;
mod status;
mod task;

pub use comment::{PersistedCommentData, TaskComment};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{CommentId, TaskId};
pub use status::TaskStatus;
pub use task::{DateRange, NewTask, PersistedTaskData, Task, TaskPatch};
