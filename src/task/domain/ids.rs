//! Identifier types for the task domain.

uuid_identifier! {
    /// Unique identifier for a task.
    TaskId
}

uuid_identifier! {
    /// Unique identifier for a task comment.
    CommentId
}
