//! Given steps for task tree BDD scenarios.

use super::world::{TaskTreeWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use trellis::{project::services::CreateProjectRequest, task::services::CreateTaskRequest};

#[given("a project managed by \"{name}\"")]
fn project_managed_by(world: &mut TaskTreeWorld, name: String) -> Result<(), eyre::Report> {
    let manager = world.user(&name);
    let request = CreateProjectRequest::new(world.company, "Roadmap");
    let project = run_async(world.projects.create(manager, request)).wrap_err("create project")?;
    world.project = Some((project.id(), manager));
    Ok(())
}

#[given("\"{name}\" has access to the project")]
fn user_has_access(world: &mut TaskTreeWorld, name: String) -> Result<(), eyre::Report> {
    let (project, manager) = world.project()?;
    let user = world.user(&name);
    run_async(world.projects.add_accesses(manager, project, &[user])).wrap_err("grant access")?;
    Ok(())
}

#[given("the top-level task \"{title}\"")]
fn top_level_task(world: &mut TaskTreeWorld, title: String) -> Result<(), eyre::Report> {
    let (project, manager) = world.project()?;
    let request = CreateTaskRequest::new(project, title.as_str());
    let details = run_async(world.service.create(manager, request)).wrap_err("create task")?;
    world.tasks.insert(title, details.task.id());
    Ok(())
}

#[given("the task \"{title}\" under \"{parent_title}\"")]
fn task_under(
    world: &mut TaskTreeWorld,
    title: String,
    parent_title: String,
) -> Result<(), eyre::Report> {
    let (project, manager) = world.project()?;
    let parent = world.task(&parent_title)?;
    let request = CreateTaskRequest::new(project, title.as_str()).with_parent(parent);
    let details = run_async(world.service.create(manager, request)).wrap_err("create subtask")?;
    world.tasks.insert(title, details.task.id());
    Ok(())
}

#[given("the store fails the second write of the next commit")]
fn store_fails_second_write(world: &mut TaskTreeWorld) {
    world.store.fail_write_at(1);
}
