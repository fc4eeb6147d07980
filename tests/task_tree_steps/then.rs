//! Then steps for task tree BDD scenarios.

use super::world::{TaskTreeWorld, run_async, split_titles};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use trellis::{error::ErrorKind, task::services::TaskTreeError};

fn expect_failure<T>(
    result: Option<&Result<T, TaskTreeError>>,
    expected: ErrorKind,
) -> Result<(), eyre::Report> {
    let outcome = result.ok_or_else(|| eyre::eyre!("missing operation result in scenario world"))?;
    match outcome {
        Ok(_) => Err(eyre::eyre!("expected {expected:?}, but the operation succeeded")),
        Err(err) if err.kind() == expected => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {expected:?}, found {err}")),
    }
}

fn children_titles(world: &TaskTreeWorld, title: &str) -> Result<Vec<String>, eyre::Report> {
    let parent = world.task(title)?;
    let details = run_async(world.service.get_by_id(parent)).wrap_err("load parent")?;
    Ok(world.titles_of(details.task.children().as_slice()))
}

#[then("the top-level tasks are \"{titles}\"")]
fn top_level_tasks_are(world: &TaskTreeWorld, titles: String) -> Result<(), eyre::Report> {
    let (project_id, _) = world.project()?;
    let project = run_async(world.projects.get_by_id(project_id)).wrap_err("load project")?;
    let actual = world.titles_of(project.top_children().as_slice());
    let expected = split_titles(&titles);
    if actual != expected {
        return Err(eyre::eyre!("expected top-level tasks {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then("\"{parent}\" has the children \"{titles}\"")]
fn parent_has_children(
    world: &TaskTreeWorld,
    parent: String,
    titles: String,
) -> Result<(), eyre::Report> {
    let actual = children_titles(world, &parent)?;
    let expected = split_titles(&titles);
    if actual != expected {
        return Err(eyre::eyre!(
            "expected {parent} to have children {expected:?}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then("\"{parent}\" has no children")]
fn parent_has_no_children(world: &TaskTreeWorld, parent: String) -> Result<(), eyre::Report> {
    let actual = children_titles(world, &parent)?;
    if !actual.is_empty() {
        return Err(eyre::eyre!("expected {parent} to be childless, found {actual:?}"));
    }
    Ok(())
}

#[then("the move fails with an invalid position")]
fn move_fails_invalid_position(world: &TaskTreeWorld) -> Result<(), eyre::Report> {
    expect_failure(world.last_move.as_ref(), ErrorKind::InvalidPosition)
}

#[then("the move fails with an aborted transaction")]
fn move_fails_aborted(world: &TaskTreeWorld) -> Result<(), eyre::Report> {
    expect_failure(world.last_move.as_ref(), ErrorKind::TransactionAborted)
}

#[then("the deletion fails with not found")]
fn deletion_fails_not_found(world: &TaskTreeWorld) -> Result<(), eyre::Report> {
    expect_failure(world.last_delete.as_ref(), ErrorKind::NotFound)
}

#[then("\"{title}\" is not deleted")]
fn task_is_not_deleted(world: &TaskTreeWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task(&title)?;
    let details = run_async(world.service.get_by_id(task)).wrap_err("load task")?;
    if details.task.is_deleted() {
        return Err(eyre::eyre!("expected {title} to remain live"));
    }
    Ok(())
}
