//! When steps for task retention BDD scenarios.

use super::world::{TaskRetentionWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskkeep::task::domain::{DeleteScope, TaskFilter, TaskQuery};

#[when("all tasks are soft-deleted")]
fn all_tasks_soft_deleted(world: &mut TaskRetentionWorld) -> Result<(), eyre::Report> {
    run_async(world.service.soft_delete(DeleteScope::All)).wrap_err("soft-delete all tasks")?;
    Ok(())
}

#[when(r#"the task "{title}" is soft-deleted"#)]
fn task_soft_deleted(world: &mut TaskRetentionWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task_titled(&title)?;
    run_async(world.service.delete_task(task.id())).wrap_err("soft-delete task")?;
    Ok(())
}

#[when("the deleted task is restored")]
fn deleted_task_restored(world: &mut TaskRetentionWorld) -> Result<(), eyre::Report> {
    let id = world.last_task()?.id();
    let restored = run_async(world.service.restore(&[id])).wrap_err("restore deleted task")?;
    eyre::ensure!(restored == 1, "expected one task restored, got {restored}");
    Ok(())
}

#[when("{days:i64} days pass")]
fn days_pass(world: &mut TaskRetentionWorld, days: i64) {
    world.clock.advance(Duration::days(days));
}

#[when("the retention sweep runs")]
fn retention_sweep_runs(world: &mut TaskRetentionWorld) -> Result<(), eyre::Report> {
    let purged = run_async(world.service.sweep_expired()).wrap_err("run retention sweep")?;
    world.last_purged = Some(purged);
    Ok(())
}

#[when("the task completion is toggled")]
fn task_completion_toggled(world: &mut TaskRetentionWorld) -> Result<(), eyre::Report> {
    let id = world.last_task()?.id();
    world.last_result = Some(run_async(world.service.toggle_completion(id)));
    Ok(())
}

#[when(r#"tasks are filtered by "{filter}" searching for "{term}""#)]
fn tasks_filtered(
    world: &mut TaskRetentionWorld,
    filter: String,
    term: String,
) -> Result<(), eyre::Report> {
    let parsed: TaskFilter = filter
        .parse()
        .map_err(|err| eyre::eyre!("invalid filter in scenario: {err}"))?;
    world.last_view = run_async(world.service.filter(&TaskQuery::new(parsed).with_search(term)));
    Ok(())
}
