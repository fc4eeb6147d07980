//! Diesel schema for the project and task tree tables.

diesel::table! {
    /// Projects with their ordered top-level task list.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Owning company.
        company_id -> Uuid,
        /// Display title.
        #[max_length = 255]
        title -> Varchar,
        /// Managing user.
        manager_id -> Uuid,
        /// Users granted access.
        accesses -> Array<Uuid>,
        /// Ordered top-level task identifiers.
        top_children -> Array<Uuid>,
        /// Latest task activity.
        task_updated_at -> Nullable<Timestamptz>,
        /// Soft-deletion timestamp.
        deleted_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks with their ordered children list.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Creating user.
        author_id -> Uuid,
        /// Parent task; null for top-level tasks.
        parent_id -> Nullable<Uuid>,
        /// Ordered child task identifiers.
        children -> Array<Uuid>,
        /// Involved users.
        involved_users -> Array<Uuid>,
        /// Comment identifiers in posting order.
        comments -> Array<Uuid>,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Body text.
        content -> Nullable<Text>,
        /// Deadline window payload.
        deadline -> Nullable<Jsonb>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Soft-deletion timestamp.
        deleted_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments posted on tasks.
    task_comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Writing user.
        author_id -> Uuid,
        /// Comment text.
        content -> Text,
        /// Soft-deletion timestamp.
        deleted_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::joinable!(task_comments -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks, task_comments);
