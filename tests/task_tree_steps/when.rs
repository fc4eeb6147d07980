//! When steps for task tree BDD scenarios.

use super::world::{TaskTreeWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use trellis::{
    ordering::Position,
    task::{
        domain::TaskId,
        services::{CreateTaskRequest, MoveChildRequest},
    },
};

fn create_top_level(
    world: &mut TaskTreeWorld,
    name: &str,
    title: String,
    position: Position,
) -> Result<(), eyre::Report> {
    let (project, _) = world.project()?;
    let user = world.user(name);
    let request = CreateTaskRequest::new(project, title.as_str()).with_position(position);
    let details = run_async(world.service.create(user, request)).wrap_err("create task")?;
    world.tasks.insert(title, details.task.id());
    Ok(())
}

fn record_move(world: &mut TaskTreeWorld, request: MoveChildRequest) -> Result<(), eyre::Report> {
    let (_, manager) = world.project()?;
    let result = run_async(world.service.move_child(manager, request));
    world.last_move = Some(result);
    Ok(())
}

#[when("\"{name}\" creates the top-level task \"{title}\"")]
fn creates_top_level(
    world: &mut TaskTreeWorld,
    name: String,
    title: String,
) -> Result<(), eyre::Report> {
    create_top_level(world, &name, title, Position::Last)
}

#[when("\"{name}\" creates the top-level task \"{title}\" at index {index:usize}")]
fn creates_top_level_at(
    world: &mut TaskTreeWorld,
    name: String,
    title: String,
    index: usize,
) -> Result<(), eyre::Report> {
    create_top_level(world, &name, title, Position::Index(index))
}

#[when("\"{title}\" is moved from \"{parent_title}\" to the top level at index {index:usize}")]
fn moved_to_top_level(
    world: &mut TaskTreeWorld,
    title: String,
    parent_title: String,
    index: usize,
) -> Result<(), eyre::Report> {
    let child = world.task(&title)?;
    let parent = world.task(&parent_title)?;
    record_move(
        world,
        MoveChildRequest::new(child, Some(parent), None).with_target_index(index),
    )
}

#[when("\"{title}\" is moved from the top level to \"{parent_title}\" after an unknown sibling")]
fn moved_after_unknown_sibling(
    world: &mut TaskTreeWorld,
    title: String,
    parent_title: String,
) -> Result<(), eyre::Report> {
    let child = world.task(&title)?;
    let parent = world.task(&parent_title)?;
    let unknown = Position::After(TaskId::new());
    record_move(
        world,
        MoveChildRequest::new(child, None, Some(parent)).with_position(unknown),
    )
}

#[when("\"{title}\" is moved from \"{source_title}\" to \"{target_title}\"")]
fn moved_between_parents(
    world: &mut TaskTreeWorld,
    title: String,
    source_title: String,
    target_title: String,
) -> Result<(), eyre::Report> {
    let child = world.task(&title)?;
    let source = world.task(&source_title)?;
    let target = world.task(&target_title)?;
    record_move(world, MoveChildRequest::new(child, Some(source), Some(target)))
}

#[when("\"{name}\" deletes \"{title}\"")]
fn deletes_task(world: &mut TaskTreeWorld, name: String, title: String) -> Result<(), eyre::Report> {
    let user = world.user(&name);
    let task = world.task(&title)?;
    let result = run_async(world.service.remove(user, task));
    world.last_delete = Some(result);
    Ok(())
}
