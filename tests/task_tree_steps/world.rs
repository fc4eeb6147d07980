//! Shared world state for task tree BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use mockable::DefaultClock;
use rstest::fixture;
use trellis::{
    identity::{CompanyId, UserId},
    project::{
        domain::ProjectId,
        services::{ProjectAccessGate, ProjectService},
    },
    store::adapters::memory::InMemoryTreeStore,
    task::{
        domain::TaskId,
        services::{MoveOutcome, TaskTreeError, TaskTreeService},
    },
};

/// Task tree service type used by the BDD world.
pub type TestTreeService =
    TaskTreeService<InMemoryTreeStore, ProjectAccessGate<InMemoryTreeStore>, DefaultClock>;

/// Scenario world for task tree behaviour tests.
pub struct TaskTreeWorld {
    pub store: Arc<InMemoryTreeStore>,
    pub projects: ProjectService<InMemoryTreeStore, DefaultClock>,
    pub service: TestTreeService,
    pub company: CompanyId,
    pub users: HashMap<String, UserId>,
    pub tasks: HashMap<String, TaskId>,
    pub project: Option<(ProjectId, UserId)>,
    pub last_move: Option<Result<MoveOutcome, TaskTreeError>>,
    pub last_delete: Option<Result<TaskId, TaskTreeError>>,
}

impl TaskTreeWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTreeStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock)),
            service: TaskTreeService::new(
                Arc::clone(&store),
                Arc::new(ProjectAccessGate::new(Arc::clone(&store))),
                clock,
            ),
            store,
            company: CompanyId::new(),
            users: HashMap::new(),
            tasks: HashMap::new(),
            project: None,
            last_move: None,
            last_delete: None,
        }
    }

    /// Returns the user registered under `name`, registering it if new.
    pub fn user(&mut self, name: &str) -> UserId {
        *self.users.entry(name.to_owned()).or_default()
    }

    /// Returns the scenario project and its manager.
    pub fn project(&self) -> Result<(ProjectId, UserId), eyre::Report> {
        self.project
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the task registered under `title`.
    pub fn task(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task {title:?} in scenario world"))
    }

    /// Maps task identifiers back to their scenario titles.
    pub fn titles_of(&self, ids: &[TaskId]) -> Vec<String> {
        ids.iter()
            .map(|id| {
                self.tasks
                    .iter()
                    .find(|(_, known)| *known == id)
                    .map_or_else(|| id.to_string(), |(title, _)| title.clone())
            })
            .collect()
    }
}

impl Default for TaskTreeWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskTreeWorld {
    TaskTreeWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated list of titles.
pub fn split_titles(titles: &str) -> Vec<String> {
    titles
        .split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
