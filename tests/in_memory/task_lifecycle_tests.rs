//! In-memory integration tests for task creation, editing and queries.

use super::helpers::{Harness, harness, ids_of};
use chrono::Duration;
use rstest::rstest;
use taskkeep::task::{
    domain::{Priority, ProgressBand, TaskDomainError, TaskFilter, TaskQuery},
    services::{CreateTaskRequest, EditTaskRequest, TaskLifecycleError, TaskLifecycleService},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_follow_completion_changes(harness: Harness) -> eyre::Result<()> {
    let mut created = Vec::new();
    for title in ["One", "Two", "Three"] {
        created.push(harness.service.add_task(CreateTaskRequest::new(title)).await?);
    }
    let first = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected created tasks"))?;
    harness.service.toggle_completion(first.id()).await?;

    let stats = harness.service.stats().await;

    eyre::ensure!(stats.total == 3);
    eyre::ensure!(stats.completed == 1);
    eyre::ensure!(stats.pending == 2);
    eyre::ensure!(stats.progress_percent() == 33);
    eyre::ensure!(stats.progress_band() == ProgressBand::Mid);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_expires_when_the_day_rolls_over(harness: Harness) -> eyre::Result<()> {
    let today = harness.clock.today();
    let due_today = harness
        .service
        .add_task(CreateTaskRequest::new("File taxes").with_due_date(today))
        .await?;

    let today_view = harness.service.filter(&TaskQuery::new(TaskFilter::Today)).await;
    eyre::ensure!(ids_of(&today_view) == vec![due_today.id()]);

    harness.clock.advance(Duration::days(1));

    let expired = harness.service.filter(&TaskQuery::new(TaskFilter::Expired)).await;
    eyre::ensure!(ids_of(&expired) == vec![due_today.id()]);
    let edit = harness
        .service
        .edit_task(EditTaskRequest::from_task(&due_today).with_title("Too late"))
        .await;
    eyre::ensure!(matches!(
        edit,
        Err(TaskLifecycleError::Domain(TaskDomainError::Expired(_)))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_can_reopen_a_completed_task(harness: Harness) -> eyre::Result<()> {
    let created = harness
        .service
        .add_task(CreateTaskRequest::new("Review PR").with_priority(Priority::High))
        .await?;
    let completed = harness.service.toggle_completion(created.id()).await?;

    let reopened = harness
        .service
        .edit_task(EditTaskRequest::from_task(&completed).with_completed(false))
        .await?;

    eyre::ensure!(!reopened.completed());
    eyre::ensure!(reopened.completed_at().is_none());
    eyre::ensure!(reopened.priority() == Priority::High);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn state_survives_a_reload(harness: Harness) -> eyre::Result<()> {
    let kept = harness
        .service
        .add_task(
            CreateTaskRequest::new("Renew passport")
                .with_description("Bring two photos")
                .with_category("Admin")
                .with_important(true),
        )
        .await?;
    harness.service.toggle_completion(kept.id()).await?;

    let reloaded = TaskLifecycleService::load(
        std::sync::Arc::new(harness.store.clone()),
        std::sync::Arc::clone(&harness.clock),
    )
    .await?;

    eyre::ensure!(reloaded.active_tasks().await == harness.service.active_tasks().await);
    Ok(())
}
