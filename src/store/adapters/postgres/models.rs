//! Diesel row models for the task tree tables.

use super::schema::{projects, task_comments, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

/// Project row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: Uuid,
    /// Owning company.
    pub company_id: Uuid,
    /// Display title.
    pub title: String,
    /// Managing user.
    pub manager_id: Uuid,
    /// Users granted access.
    pub accesses: Vec<Uuid>,
    /// Ordered top-level task identifiers.
    pub top_children: Vec<Uuid>,
    /// Latest task activity.
    pub task_updated_at: Option<DateTime<Utc>>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Project field update; the top-level list is written separately.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub struct ProjectChanges {
    /// Owning company.
    pub company_id: Uuid,
    /// Display title.
    pub title: String,
    /// Managing user.
    pub manager_id: Uuid,
    /// Users granted access.
    pub accesses: Vec<Uuid>,
    /// Latest task activity.
    pub task_updated_at: Option<DateTime<Utc>>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Creating user.
    pub author_id: Uuid,
    /// Parent task.
    pub parent_id: Option<Uuid>,
    /// Ordered child task identifiers.
    pub children: Vec<Uuid>,
    /// Involved users.
    pub involved_users: Vec<Uuid>,
    /// Comment identifiers in posting order.
    pub comments: Vec<Uuid>,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: Option<String>,
    /// Deadline window payload.
    pub deadline: Option<Value>,
    /// Workflow status.
    pub status: String,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task field update; the children list is written separately.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChanges {
    /// Owning project.
    pub project_id: Uuid,
    /// Parent task.
    pub parent_id: Option<Uuid>,
    /// Involved users.
    pub involved_users: Vec<Uuid>,
    /// Comment identifiers in posting order.
    pub comments: Vec<Uuid>,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: Option<String>,
    /// Deadline window payload.
    pub deadline: Option<Value>,
    /// Workflow status.
    pub status: String,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Comment row, used for reads, inserts, and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = task_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct CommentRow {
    /// Comment identifier.
    pub id: Uuid,
    /// Owning task.
    pub task_id: Uuid,
    /// Writing user.
    pub author_id: Uuid,
    /// Comment text.
    pub content: String,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
