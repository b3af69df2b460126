//! Given steps for task retention BDD scenarios.

use super::world::{TaskRetentionWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskkeep::task::{domain::Priority, services::CreateTaskRequest};

fn create(world: &mut TaskRetentionWorld, request: CreateTaskRequest) -> Result<(), eyre::Report> {
    let created =
        run_async(world.service.add_task(request)).wrap_err("create task for scenario setup")?;
    world.last_created_task = Some(created);
    Ok(())
}

#[given(r#"a task titled "{title}""#)]
fn task_titled(world: &mut TaskRetentionWorld, title: String) -> Result<(), eyre::Report> {
    create(world, CreateTaskRequest::new(title))
}

#[given(r#"a task titled "{title}" due {days:i64} days ago"#)]
fn task_due_days_ago(
    world: &mut TaskRetentionWorld,
    title: String,
    days: i64,
) -> Result<(), eyre::Report> {
    let due = world.clock.today() - Duration::days(days);
    create(world, CreateTaskRequest::new(title).with_due_date(due))
}

#[given(r#"a task with priority "{priority}" titled "{title}""#)]
fn task_with_priority(
    world: &mut TaskRetentionWorld,
    priority: String,
    title: String,
) -> Result<(), eyre::Report> {
    let parsed: Priority = priority
        .parse()
        .map_err(|err| eyre::eyre!("invalid priority in scenario: {err}"))?;
    create(world, CreateTaskRequest::new(title).with_priority(parsed))
}

#[given(r#"the task "{title}" has been soft-deleted"#)]
fn task_has_been_soft_deleted(
    world: &mut TaskRetentionWorld,
    title: String,
) -> Result<(), eyre::Report> {
    let task = world.task_titled(&title)?;
    run_async(world.service.delete_task(task.id())).wrap_err("soft-delete task in setup")?;
    Ok(())
}
