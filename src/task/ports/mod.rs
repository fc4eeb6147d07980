//! Port contracts for the task tree.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{CommentRepository, TaskRepository};
