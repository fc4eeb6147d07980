//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use trellis::{
    identity::{CompanyId, UserId},
    project::services::{ProjectAccessGate, ProjectService},
    store::adapters::memory::InMemoryTreeStore,
    task::services::TaskTreeService,
};

/// Task tree service wired to the in-memory store.
pub type TreeService =
    TaskTreeService<InMemoryTreeStore, ProjectAccessGate<InMemoryTreeStore>, DefaultClock>;

/// Services sharing one in-memory store.
pub struct Services {
    /// Shared store.
    pub store: Arc<InMemoryTreeStore>,
    /// Project service.
    pub projects: ProjectService<InMemoryTreeStore, DefaultClock>,
    /// Task tree service.
    pub tasks: TreeService,
    /// Tenant used by the test.
    pub company: CompanyId,
    /// Project manager used by the test.
    pub manager: UserId,
}

/// Provides services over a fresh store for each test.
#[fixture]
pub fn services() -> Services {
    let store = Arc::new(InMemoryTreeStore::new());
    let clock = Arc::new(DefaultClock);
    Services {
        projects: ProjectService::new(Arc::clone(&store), Arc::clone(&clock)),
        tasks: TaskTreeService::new(
            Arc::clone(&store),
            Arc::new(ProjectAccessGate::new(Arc::clone(&store))),
            clock,
        ),
        store,
        company: CompanyId::new(),
        manager: UserId::new(),
    }
}
