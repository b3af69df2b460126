//! Then steps for task retention BDD scenarios.

use super::world::{TaskRetentionWorld, run_async, titles};
use rstest_bdd_macros::then;
use taskkeep::task::{domain::TaskDomainError, services::TaskLifecycleError};

#[then("the active list is empty")]
fn active_list_empty(world: &TaskRetentionWorld) -> Result<(), eyre::Report> {
    let active = run_async(world.service.active_tasks());
    eyre::ensure!(active.is_empty(), "expected no active tasks, found {}", active.len());
    Ok(())
}

#[then(r#"the active list contains only "{title}""#)]
fn active_list_contains_only(world: &TaskRetentionWorld, title: String) -> Result<(), eyre::Report> {
    let active = titles(&run_async(world.service.active_tasks()));
    eyre::ensure!(active == vec![title], "unexpected active tasks: {active:?}");
    Ok(())
}

#[then(r#"the deleted list contains only "{title}""#)]
fn deleted_list_contains_only(
    world: &TaskRetentionWorld,
    title: String,
) -> Result<(), eyre::Report> {
    let deleted: Vec<String> = run_async(world.service.deleted_tasks())
        .iter()
        .map(|task| task.task().title().as_str().to_owned())
        .collect();
    eyre::ensure!(deleted == vec![title], "unexpected deleted tasks: {deleted:?}");
    Ok(())
}

#[then("the deleted task is purged {days:i64} days after deletion")]
fn deleted_task_purge_time(world: &TaskRetentionWorld, days: i64) -> Result<(), eyre::Report> {
    let id = world.last_task()?.id();
    let deleted = run_async(world.service.deleted_tasks());
    let entry = deleted
        .iter()
        .find(|task| task.id() == id)
        .ok_or_else(|| eyre::eyre!("task {id} is not in the deleted list"))?;
    eyre::ensure!(entry.permanent_delete_at() - entry.deleted_at() == chrono::Duration::days(days));
    Ok(())
}

#[then("{count:usize} deleted task was purged")]
fn deleted_tasks_purged(world: &TaskRetentionWorld, count: usize) -> Result<(), eyre::Report> {
    let purged = world
        .last_purged
        .ok_or_else(|| eyre::eyre!("retention sweep has not run"))?;
    eyre::ensure!(purged == count, "expected {count} purged, got {purged}");
    Ok(())
}

#[then("the operation fails with an expired task error")]
fn operation_fails_expired(world: &TaskRetentionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;
    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::Expired(_)))
    ) {
        return Err(eyre::eyre!("expected Expired error, got {result:?}"));
    }
    Ok(())
}

#[then("the task is still pending")]
fn task_still_pending(world: &TaskRetentionWorld) -> Result<(), eyre::Report> {
    let id = world.last_task()?.id();
    let task = run_async(world.service.find_task(id))
        .ok_or_else(|| eyre::eyre!("task {id} is no longer active"))?;
    eyre::ensure!(!task.completed(), "task {id} was completed");
    Ok(())
}

#[then(r#"the view contains only "{title}""#)]
fn view_contains_only(world: &TaskRetentionWorld, title: String) -> Result<(), eyre::Report> {
    let view = titles(&world.last_view);
    eyre::ensure!(view == vec![title], "unexpected view: {view:?}");
    Ok(())
}
