//! End-to-end project and task tree workflows over the in-memory store.

use super::helpers::{Services, services};
use rstest::rstest;
use trellis::{
    error::ErrorKind,
    identity::UserId,
    ordering::Position,
    project::services::CreateProjectRequest,
    task::{
        domain::{TaskPatch, TaskStatus},
        services::{CreateCommentRequest, CreateTaskRequest, MoveChildRequest, TaskNode},
    },
};

fn titles(nodes: &[TaskNode]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| {
            if node.children.is_empty() {
                node.task.title().to_owned()
            } else {
                format!("{}({})", node.task.title(), titles(&node.children).join(","))
            }
        })
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_plans_and_reorganises_a_project(services: Services) {
    let member = UserId::new();
    let project = services
        .projects
        .create(
            services.manager,
            CreateProjectRequest::new(services.company, "Launch").with_accesses([member]),
        )
        .await
        .expect("project creation should succeed")
        .id();

    let design = services
        .tasks
        .create(services.manager, CreateTaskRequest::new(project, "Design"))
        .await
        .expect("task creation should succeed")
        .task
        .id();
    let build = services
        .tasks
        .create(member, CreateTaskRequest::new(project, "Build"))
        .await
        .expect("task creation should succeed")
        .task
        .id();
    let wireframes = services
        .tasks
        .create(
            member,
            CreateTaskRequest::new(project, "Wireframes").with_parent(design),
        )
        .await
        .expect("task creation should succeed")
        .task
        .id();
    services
        .tasks
        .create(
            services.manager,
            CreateTaskRequest::new(project, "Research")
                .with_parent(design)
                .with_position(Position::Index(0)),
        )
        .await
        .expect("task creation should succeed");

    services
        .tasks
        .move_child(
            member,
            MoveChildRequest::new(wireframes, Some(design), Some(build)),
        )
        .await
        .expect("move should succeed");
    services
        .tasks
        .update(
            member,
            build,
            TaskPatch::new().with_status(TaskStatus::OnGoing),
        )
        .await
        .expect("update should succeed");
    services
        .tasks
        .create_comment(member, CreateCommentRequest::new(build, "Started"))
        .await
        .expect("comment should post");

    let tree = services
        .tasks
        .project_tree(services.manager, project)
        .await
        .expect("tree should load");
    assert_eq!(titles(&tree), vec!["Design(Research)", "Build(Wireframes)"]);

    let build_details = services
        .tasks
        .get_by_id(build)
        .await
        .expect("lookup should succeed");
    assert_eq!(build_details.task.status(), TaskStatus::OnGoing);
    assert_eq!(build_details.comments.len(), 1);

    let project_doc = services
        .projects
        .get_by_id(project)
        .await
        .expect("project should exist");
    assert!(project_doc.task_updated_at().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_projects_hide_their_tasks(services: Services) {
    let project = services
        .projects
        .create(
            services.manager,
            CreateProjectRequest::new(services.company, "Sunset"),
        )
        .await
        .expect("project creation should succeed")
        .id();
    let task = services
        .tasks
        .create(services.manager, CreateTaskRequest::new(project, "Archive"))
        .await
        .expect("task creation should succeed")
        .task
        .id();

    services
        .projects
        .remove(services.manager, project)
        .await
        .expect("removal should succeed");

    let lookup = services
        .tasks
        .get_by_id_with_access_check(task, services.manager)
        .await
        .expect_err("task should be hidden");
    assert_eq!(lookup.kind(), ErrorKind::NotFound);

    let creation = services
        .tasks
        .create(services.manager, CreateTaskRequest::new(project, "Late"))
        .await
        .expect_err("creation should be refused");
    assert_eq!(creation.kind(), ErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moved_subtrees_follow_their_root_across_projects(services: Services) {
    let source = services
        .projects
        .create(
            services.manager,
            CreateProjectRequest::new(services.company, "Source"),
        )
        .await
        .expect("project creation should succeed")
        .id();
    let target = services
        .projects
        .create(
            services.manager,
            CreateProjectRequest::new(services.company, "Target"),
        )
        .await
        .expect("project creation should succeed")
        .id();

    let epic = services
        .tasks
        .create(services.manager, CreateTaskRequest::new(source, "Epic"))
        .await
        .expect("task creation should succeed")
        .task
        .id();
    let story = services
        .tasks
        .create(
            services.manager,
            CreateTaskRequest::new(source, "Story").with_parent(epic),
        )
        .await
        .expect("task creation should succeed")
        .task
        .id();
    let host = services
        .tasks
        .create(services.manager, CreateTaskRequest::new(target, "Host"))
        .await
        .expect("task creation should succeed")
        .task
        .id();

    let outcome = services
        .tasks
        .move_child(
            services.manager,
            MoveChildRequest::new(epic, None, Some(host)),
        )
        .await
        .expect("move should succeed");
    assert_eq!(outcome.child.project(), target);
    assert!(outcome.source.children().is_empty());

    let source_tree = services
        .tasks
        .project_tree(services.manager, source)
        .await
        .expect("tree should load");
    assert!(source_tree.is_empty());
    let target_tree = services
        .tasks
        .project_tree(services.manager, target)
        .await
        .expect("tree should load");
    assert_eq!(titles(&target_tree), vec!["Host(Epic(Story))"]);

    let story_details = services
        .tasks
        .get_by_id(story)
        .await
        .expect("lookup should succeed");
    assert_eq!(story_details.project.id(), target);
    assert_eq!(story_details.task.parent(), Some(epic));
}
