//! Unit-of-work and read-filter behaviour of the in-memory store.

use mockable::DefaultClock;
use rstest::{fixture, rstest};
use trellis::{
    error::EntityRef,
    identity::{CompanyId, UserId},
    ordering::{ChildList, Position},
    project::{
        domain::{NewProject, Project},
        ports::ProjectRepository,
    },
    store::{
        AtomicWriter, DeletedFilter, StoreError, UnitOfWork, adapters::memory::InMemoryTreeStore,
    },
    task::{
        domain::{NewTask, Task, TaskId},
        ports::TaskRepository,
    },
};

#[fixture]
fn store() -> InMemoryTreeStore {
    InMemoryTreeStore::new()
}

#[fixture]
fn project() -> Project {
    Project::new(
        NewProject {
            company: CompanyId::new(),
            title: "Store".to_owned(),
            manager: UserId::new(),
            accesses: Vec::new(),
        },
        &DefaultClock,
    )
    .expect("valid project")
}

fn task_in(project: &Project, title: &str) -> Task {
    Task::new(
        NewTask {
            project: project.id(),
            author: project.manager(),
            parent: None,
            title: title.to_owned(),
            content: None,
            deadline: None,
            involved_users: Vec::new(),
        },
        &DefaultClock,
    )
    .expect("valid task")
}

async fn seed(store: &InMemoryTreeStore, project: &Project, tasks: &[Task]) {
    let mut unit = UnitOfWork::new();
    unit.insert_project(project.clone());
    for task in tasks {
        unit.insert_task(task.clone());
    }
    unit.set_top_children(project.id(), tasks.iter().map(Task::id).collect());
    store.commit(unit).await.expect("seed should commit");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_writes_are_visible_together(store: InMemoryTreeStore, project: Project) {
    let a = task_in(&project, "a");
    let b = task_in(&project, "b");

    seed(&store, &project, &[a.clone(), b.clone()]).await;

    let stored = store
        .find_project(project.id(), DeletedFilter::Exclude)
        .await
        .expect("lookup should succeed")
        .expect("project should exist");
    assert_eq!(stored.top_children().as_slice(), &[a.id(), b.id()]);
    let found = store
        .find_tasks(&[b.id(), TaskId::new(), a.id()], DeletedFilter::Exclude)
        .await
        .expect("lookup should succeed");
    let ids: Vec<TaskId> = found.iter().map(Task::id).collect();
    assert_eq!(ids, vec![b.id(), a.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_missing_target_discards_the_whole_unit(store: InMemoryTreeStore, project: Project) {
    seed(&store, &project, &[]).await;
    let orphan = task_in(&project, "orphan");
    let missing = TaskId::new();

    let mut unit = UnitOfWork::new();
    unit.insert_task(orphan.clone())
        .set_top_children(project.id(), ChildList::from_ids([orphan.id()]))
        .set_children(missing, ChildList::new());
    let result = store.commit(unit).await;

    assert!(matches!(
        result,
        Err(StoreError::Missing(EntityRef::Task(id))) if id == missing
    ));
    assert_eq!(store.task_count(), 0);
    let stored = store
        .find_project(project.id(), DeletedFilter::Include)
        .await
        .expect("lookup should succeed")
        .expect("project should exist");
    assert!(stored.top_children().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_inserts_are_rejected(store: InMemoryTreeStore, project: Project) {
    seed(&store, &project, &[]).await;

    let mut unit = UnitOfWork::new();
    unit.insert_project(project.clone());
    let result = store.commit(unit).await;

    assert!(matches!(result, Err(StoreError::Duplicate(EntityRef::Project(_)))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_saves_leave_the_children_list_alone(store: InMemoryTreeStore, project: Project) {
    let mut parent = task_in(&project, "parent");
    seed(&store, &project, &[parent.clone()]).await;
    let child = TaskId::new();

    let mut unit = UnitOfWork::new();
    unit.set_children(parent.id(), ChildList::from_ids([child]));
    store.commit(unit).await.expect("list write should commit");

    parent.add_child(TaskId::new(), Position::Last).expect("append");
    let mut unit = UnitOfWork::new();
    unit.save_task(parent.clone());
    store.commit(unit).await.expect("save should commit");

    let stored = store
        .find_task(parent.id(), DeletedFilter::Exclude)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(stored.children().as_slice(), &[child]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_documents_only_show_when_included(store: InMemoryTreeStore, project: Project) {
    let mut task = task_in(&project, "gone");
    seed(&store, &project, &[task.clone()]).await;
    task.mark_deleted(&DefaultClock);
    let mut unit = UnitOfWork::new();
    unit.save_task(task.clone());
    store.commit(unit).await.expect("save should commit");

    let hidden = store
        .find_task(task.id(), DeletedFilter::Exclude)
        .await
        .expect("lookup should succeed");
    let shown = store
        .find_task(task.id(), DeletedFilter::Include)
        .await
        .expect("lookup should succeed");

    assert!(hidden.is_none());
    assert!(shown.is_some_and(|found| found.is_deleted()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn injected_faults_fire_once(store: InMemoryTreeStore, project: Project) {
    store.fail_write_at(0);

    let mut unit = UnitOfWork::new();
    unit.insert_project(project.clone());
    let first = store.commit(unit.clone()).await;
    let second = store.commit(unit).await;

    assert!(matches!(first, Err(StoreError::Persistence(_))));
    assert!(second.is_ok());
}
