//! `PostgreSQL` implementation of the store ports.

use super::{
    models::{CommentRow, ProjectChanges, ProjectRow, TaskChanges, TaskRow},
    schema::{projects, task_comments, tasks},
};
use crate::{
    error::EntityRef,
    identity::{CompanyId, UserId},
    ordering::ChildList,
    project::{
        domain::{PersistedProjectData, Project, ProjectId},
        ports::ProjectRepository,
    },
    store::{AtomicWriter, DeletedFilter, StagedWrite, StoreError, StoreResult, UnitOfWork},
    task::{
        domain::{
            CommentId, PersistedCommentData, PersistedTaskData, Task, TaskComment, TaskId,
            TaskStatus,
        },
        ports::{CommentRepository, TaskRepository},
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by the store.
pub type TreePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed implementation of every store port.
#[derive(Debug, Clone)]
pub struct PostgresTreeStore {
    pool: TreePgPool,
}

impl PostgresTreeStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TreePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ProjectRepository for PostgresTreeStore {
    async fn find_project(
        &self,
        id: ProjectId,
        filter: DeletedFilter,
    ) -> StoreResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let mut query = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .into_boxed();
            if filter == DeletedFilter::Exclude {
                query = query.filter(projects::deleted_at.is_null());
            }
            let row = query
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            Ok(row.map(row_to_project))
        })
        .await
    }

    async fn find_projects_by_company(
        &self,
        company: CompanyId,
        filter: DeletedFilter,
    ) -> StoreResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let mut query = projects::table
                .filter(projects::company_id.eq(company.into_inner()))
                .into_boxed();
            if filter == DeletedFilter::Exclude {
                query = query.filter(projects::deleted_at.is_null());
            }
            let rows = query
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            Ok(rows.into_iter().map(row_to_project).collect())
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresTreeStore {
    async fn find_task(&self, id: TaskId, filter: DeletedFilter) -> StoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .into_boxed();
            if filter == DeletedFilter::Exclude {
                query = query.filter(tasks::deleted_at.is_null());
            }
            let row = query
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_tasks(&self, ids: &[TaskId], filter: DeletedFilter) -> StoreResult<Vec<Task>> {
        let order = ids.to_vec();
        self.run_blocking(move |connection| {
            let uuids: Vec<Uuid> = order.iter().map(|id| id.into_inner()).collect();
            let mut query = tasks::table.filter(tasks::id.eq_any(uuids)).into_boxed();
            if filter == DeletedFilter::Exclude {
                query = query.filter(tasks::deleted_at.is_null());
            }
            let rows = query
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            let mut found = rows
                .into_iter()
                .map(|row| row_to_task(row).map(|task| (task.id(), task)))
                .collect::<StoreResult<HashMap<_, _>>>()?;
            Ok(order.iter().filter_map(|id| found.remove(id)).collect())
        })
        .await
    }

    async fn find_tasks_by_project(
        &self,
        project: ProjectId,
        filter: DeletedFilter,
    ) -> StoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::project_id.eq(project.into_inner()))
                .into_boxed();
            if filter == DeletedFilter::Exclude {
                query = query.filter(tasks::deleted_at.is_null());
            }
            let rows = query
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

#[async_trait]
impl CommentRepository for PostgresTreeStore {
    async fn find_comment(
        &self,
        id: CommentId,
        filter: DeletedFilter,
    ) -> StoreResult<Option<TaskComment>> {
        self.run_blocking(move |connection| {
            let mut query = task_comments::table
                .filter(task_comments::id.eq(id.into_inner()))
                .into_boxed();
            if filter == DeletedFilter::Exclude {
                query = query.filter(task_comments::deleted_at.is_null());
            }
            let row = query
                .select(CommentRow::as_select())
                .first::<CommentRow>(connection)
                .optional()?;
            Ok(row.map(row_to_comment))
        })
        .await
    }

    async fn find_comments(
        &self,
        ids: &[CommentId],
        filter: DeletedFilter,
    ) -> StoreResult<Vec<TaskComment>> {
        let order = ids.to_vec();
        self.run_blocking(move |connection| {
            let uuids: Vec<Uuid> = order.iter().map(|id| id.into_inner()).collect();
            let mut query = task_comments::table
                .filter(task_comments::id.eq_any(uuids))
                .into_boxed();
            if filter == DeletedFilter::Exclude {
                query = query.filter(task_comments::deleted_at.is_null());
            }
            let mut found: HashMap<CommentId, TaskComment> = query
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)?
                .into_iter()
                .map(row_to_comment)
                .map(|comment| (comment.id(), comment))
                .collect();
            Ok(order.iter().filter_map(|id| found.remove(id)).collect())
        })
        .await
    }
}

#[async_trait]
impl AtomicWriter for PostgresTreeStore {
    async fn commit(&self, unit: UnitOfWork) -> StoreResult<()> {
        let writes = unit.into_writes();
        self.run_blocking(move |connection| {
            connection.transaction::<_, StoreError, _>(|tx| {
                for write in writes {
                    apply_write(tx, write)?;
                }
                Ok(())
            })
        })
        .await
    }
}

fn apply_write(connection: &mut PgConnection, write: StagedWrite) -> StoreResult<()> {
    match write {
        StagedWrite::InsertProject(project) => {
            let entity = EntityRef::from(project.id());
            diesel::insert_into(projects::table)
                .values(project_to_row(&project))
                .execute(connection)
                .map_err(|err| duplicate_or(entity, err))?;
        }
        StagedWrite::SaveProject(project) => {
            let updated = diesel::update(projects::table.find(project.id().into_inner()))
                .set(project_to_changes(&project))
                .execute(connection)?;
            ensure_updated(updated, project.id())?;
        }
        StagedWrite::SetTopChildren { project, children } => {
            let updated = diesel::update(projects::table.find(project.into_inner()))
                .set(projects::top_children.eq(list_to_uuids(&children)))
                .execute(connection)?;
            ensure_updated(updated, project)?;
        }
        StagedWrite::TouchProject { project, at } => {
            let updated = diesel::update(projects::table.find(project.into_inner()))
                .set(projects::task_updated_at.eq(Some(at)))
                .execute(connection)?;
            ensure_updated(updated, project)?;
        }
        StagedWrite::InsertTask(task) => {
            let entity = EntityRef::from(task.id());
            diesel::insert_into(tasks::table)
                .values(task_to_row(&task)?)
                .execute(connection)
                .map_err(|err| duplicate_or(entity, err))?;
        }
        StagedWrite::SaveTask(task) => {
            let updated = diesel::update(tasks::table.find(task.id().into_inner()))
                .set(task_to_changes(&task)?)
                .execute(connection)?;
            ensure_updated(updated, task.id())?;
        }
        StagedWrite::SetChildren { task, children } => {
            let updated = diesel::update(tasks::table.find(task.into_inner()))
                .set(tasks::children.eq(list_to_uuids(&children)))
                .execute(connection)?;
            ensure_updated(updated, task)?;
        }
        StagedWrite::InsertComment(comment) => {
            let entity = EntityRef::from(comment.id());
            diesel::insert_into(task_comments::table)
                .values(comment_to_row(&comment))
                .execute(connection)
                .map_err(|err| duplicate_or(entity, err))?;
        }
        StagedWrite::SaveComment(comment) => {
            let updated = diesel::update(task_comments::table.find(comment.id().into_inner()))
                .set(comment_to_row(&comment))
                .execute(connection)?;
            ensure_updated(updated, comment.id())?;
        }
    }
    Ok(())
}

fn ensure_updated(rows: usize, entity: impl Into<EntityRef>) -> StoreResult<()> {
    if rows == 0 {
        return Err(StoreError::Missing(entity.into()));
    }
    Ok(())
}

fn duplicate_or(entity: EntityRef, err: DieselError) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::Duplicate(entity)
        }
        other => other.into(),
    }
}

fn list_to_uuids(list: &ChildList) -> Vec<Uuid> {
    list.iter().map(TaskId::into_inner).collect()
}

fn users_to_uuids(users: &[UserId]) -> Vec<Uuid> {
    users.iter().map(|user| user.into_inner()).collect()
}

fn project_to_row(project: &Project) -> ProjectRow {
    ProjectRow {
        id: project.id().into_inner(),
        company_id: project.company().into_inner(),
        title: project.title().to_owned(),
        manager_id: project.manager().into_inner(),
        accesses: users_to_uuids(project.accesses()),
        top_children: list_to_uuids(project.top_children()),
        task_updated_at: project.task_updated_at(),
        deleted_at: project.deleted_at(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn project_to_changes(project: &Project) -> ProjectChanges {
    ProjectChanges {
        company_id: project.company().into_inner(),
        title: project.title().to_owned(),
        manager_id: project.manager().into_inner(),
        accesses: users_to_uuids(project.accesses()),
        task_updated_at: project.task_updated_at(),
        deleted_at: project.deleted_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> Project {
    Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        company: CompanyId::from_uuid(row.company_id),
        title: row.title,
        manager: UserId::from_uuid(row.manager_id),
        accesses: row.accesses.into_iter().map(UserId::from_uuid).collect(),
        top_children: row.top_children.into_iter().map(TaskId::from_uuid).collect(),
        task_updated_at: row.task_updated_at,
        deleted_at: row.deleted_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn task_to_row(task: &Task) -> StoreResult<TaskRow> {
    Ok(TaskRow {
        id: task.id().into_inner(),
        project_id: task.project().into_inner(),
        author_id: task.author().into_inner(),
        parent_id: task.parent().map(TaskId::into_inner),
        children: list_to_uuids(task.children()),
        involved_users: users_to_uuids(task.involved_users()),
        comments: task.comments().iter().map(|id| id.into_inner()).collect(),
        title: task.title().to_owned(),
        content: task.content().map(ToOwned::to_owned),
        deadline: deadline_to_value(task)?,
        status: task.status().as_str().to_owned(),
        deleted_at: task.deleted_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn task_to_changes(task: &Task) -> StoreResult<TaskChanges> {
    Ok(TaskChanges {
        project_id: task.project().into_inner(),
        parent_id: task.parent().map(TaskId::into_inner),
        involved_users: users_to_uuids(task.involved_users()),
        comments: task.comments().iter().map(|id| id.into_inner()).collect(),
        title: task.title().to_owned(),
        content: task.content().map(ToOwned::to_owned),
        deadline: deadline_to_value(task)?,
        status: task.status().as_str().to_owned(),
        deleted_at: task.deleted_at(),
        updated_at: task.updated_at(),
    })
}

fn deadline_to_value(task: &Task) -> StoreResult<Option<serde_json::Value>> {
    task.deadline()
        .map(serde_json::to_value)
        .transpose()
        .map_err(StoreError::persistence)
}

fn row_to_task(row: TaskRow) -> StoreResult<Task> {
    let TaskRow {
        id,
        project_id,
        author_id,
        parent_id,
        children,
        involved_users,
        comments,
        title,
        content,
        deadline: deadline_json,
        status: status_text,
        deleted_at,
        created_at,
        updated_at,
    } = row;

    let deadline = deadline_json
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreError::persistence)?;
    let status = TaskStatus::try_from(status_text.as_str()).map_err(StoreError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        project: ProjectId::from_uuid(project_id),
        author: UserId::from_uuid(author_id),
        parent: parent_id.map(TaskId::from_uuid),
        children: children.into_iter().map(TaskId::from_uuid).collect(),
        involved_users: involved_users.into_iter().map(UserId::from_uuid).collect(),
        comments: comments.into_iter().map(CommentId::from_uuid).collect(),
        title,
        content,
        deadline,
        status,
        deleted_at,
        created_at,
        updated_at,
    }))
}

fn comment_to_row(comment: &TaskComment) -> CommentRow {
    CommentRow {
        id: comment.id().into_inner(),
        task_id: comment.task().into_inner(),
        author_id: comment.author().into_inner(),
        content: comment.content().to_owned(),
        deleted_at: comment.deleted_at(),
        created_at: comment.created_at(),
        updated_at: comment.updated_at(),
    }
}

fn row_to_comment(row: CommentRow) -> TaskComment {
    TaskComment::from_persisted(PersistedCommentData {
        id: CommentId::from_uuid(row.id),
        task: TaskId::from_uuid(row.task_id),
        author: UserId::from_uuid(row.author_id),
        content: row.content,
        deleted_at: row.deleted_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
