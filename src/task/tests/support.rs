//! Shared fixtures for task service tests.

use std::sync::Arc;

use crate::{
    identity::{CompanyId, UserId},
    ordering::Position,
    project::{
        domain::{Project, ProjectId},
        services::{CreateProjectRequest, ProjectAccessGate, ProjectService},
    },
    store::{DeletedFilter, adapters::memory::InMemoryTreeStore},
    task::{
        domain::{Task, TaskId},
        ports::TaskRepository,
        services::{CreateTaskRequest, TaskTreeService},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

pub type TestService =
    TaskTreeService<InMemoryTreeStore, ProjectAccessGate<InMemoryTreeStore>, DefaultClock>;

pub struct Harness {
    pub service: TestService,
    pub projects: ProjectService<InMemoryTreeStore, DefaultClock>,
    pub store: Arc<InMemoryTreeStore>,
    pub user: UserId,
    pub company: CompanyId,
}

#[fixture]
pub fn harness() -> Harness {
    let store = Arc::new(InMemoryTreeStore::new());
    let clock = Arc::new(DefaultClock);
    Harness {
        service: TaskTreeService::new(
            Arc::clone(&store),
            Arc::new(ProjectAccessGate::new(Arc::clone(&store))),
            Arc::clone(&clock),
        ),
        projects: ProjectService::new(Arc::clone(&store), clock),
        store,
        user: UserId::new(),
        company: CompanyId::new(),
    }
}

impl Harness {
    pub async fn project(&self) -> ProjectId {
        self.projects
            .create(self.user, CreateProjectRequest::new(self.company, "Project"))
            .await
            .expect("project creation should succeed")
            .id()
    }

    /// Grants a new user access to `project` and returns them.
    pub async fn member_of(&self, project: ProjectId) -> UserId {
        let member = UserId::new();
        self.projects
            .add_accesses(self.user, project, &[member])
            .await
            .expect("granting access should succeed");
        member
    }

    pub async fn top_level(&self, project: ProjectId, title: &str) -> TaskId {
        self.service
            .create(self.user, CreateTaskRequest::new(project, title))
            .await
            .expect("task creation should succeed")
            .task
            .id()
    }

    pub async fn child(&self, project: ProjectId, parent: TaskId, title: &str) -> TaskId {
        self.service
            .create(
                self.user,
                CreateTaskRequest::new(project, title).with_parent(parent),
            )
            .await
            .expect("task creation should succeed")
            .task
            .id()
    }

    pub async fn child_at(
        &self,
        project: ProjectId,
        parent: TaskId,
        title: &str,
        position: Position,
    ) -> TaskId {
        self.service
            .create(
                self.user,
                CreateTaskRequest::new(project, title)
                    .with_parent(parent)
                    .with_position(position),
            )
            .await
            .expect("task creation should succeed")
            .task
            .id()
    }

    pub async fn task(&self, id: TaskId) -> Task {
        self.store
            .find_task(id, DeletedFilter::Include)
            .await
            .expect("lookup should succeed")
            .expect("task should exist")
    }

    pub async fn children_of(&self, id: TaskId) -> Vec<TaskId> {
        self.task(id).await.children().as_slice().to_vec()
    }

    pub async fn project_doc(&self, id: ProjectId) -> Project {
        self.projects
            .get_by_id(id)
            .await
            .expect("project should exist")
    }

    pub async fn top_children_of(&self, id: ProjectId) -> Vec<TaskId> {
        self.project_doc(id).await.top_children().as_slice().to_vec()
    }
}
