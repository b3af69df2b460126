//! In-memory integration tests for soft deletion and the retention window.

use std::time::Duration as StdDuration;

use super::helpers::{Harness, harness, ids_of};
use chrono::Duration;
use rstest::rstest;
use taskkeep::task::{
    domain::{DeleteScope, RETENTION_DAYS, TaskFilter, TaskQuery},
    services::{CreateTaskRequest, RetentionSweeper, TaskChange},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_within_window_returns_identical_task(harness: Harness) -> eyre::Result<()> {
    let task = harness
        .service
        .add_task(CreateTaskRequest::new("Water plants").with_category("Home"))
        .await?;
    let done = harness.service.toggle_completion(task.id()).await?;

    harness.service.delete_task(done.id()).await?;
    harness
        .clock
        .advance(Duration::days(RETENTION_DAYS) - Duration::seconds(1));
    eyre::ensure!(harness.service.sweep_expired().await? == 0);
    eyre::ensure!(harness.service.restore(&[done.id()]).await? == 1);

    eyre::ensure!(harness.service.find_task(done.id()).await == Some(done));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_tasks_leave_queries_and_stats(harness: Harness) -> eyre::Result<()> {
    let keep = harness.service.add_task(CreateTaskRequest::new("Keep")).await?;
    let dropped = harness.service.add_task(CreateTaskRequest::new("Drop")).await?;

    harness
        .service
        .soft_delete(DeleteScope::Ids(vec![dropped.id()]))
        .await?;

    let all = harness.service.filter(&TaskQuery::new(TaskFilter::All)).await;
    eyre::ensure!(ids_of(&all) == vec![keep.id()]);
    eyre::ensure!(harness.service.stats().await.total == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restored_expired_task_stays_locked(harness: Harness) -> eyre::Result<()> {
    let yesterday = harness.clock.today() - Duration::days(1);
    let overdue = harness
        .service
        .add_task(CreateTaskRequest::new("Overdue").with_due_date(yesterday))
        .await?;
    harness.service.delete_task(overdue.id()).await?;
    let deleted = harness.service.deleted_tasks().await;
    eyre::ensure!(
        deleted
            .iter()
            .all(|task| task.is_expired_on(harness.clock.today()))
    );

    harness.service.restore(&[overdue.id()]).await?;

    eyre::ensure!(harness.service.toggle_completion(overdue.id()).await.is_err());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn running_sweeper_purges_after_window(harness: Harness) -> eyre::Result<()> {
    let task = harness.service.add_task(CreateTaskRequest::new("Old")).await?;
    harness.service.soft_delete(DeleteScope::All).await?;
    harness.clock.advance(Duration::days(RETENTION_DAYS) + Duration::milliseconds(1));
    let mut changes = harness.service.subscribe();

    let sweeper =
        RetentionSweeper::new(harness.service.clone(), StdDuration::from_millis(10)).spawn();
    let change = tokio::time::timeout(StdDuration::from_secs(5), changes.recv()).await??;
    sweeper.shutdown().await?;

    eyre::ensure!(change == TaskChange::Swept(1));
    eyre::ensure!(harness.service.deleted_tasks().await.is_empty());
    eyre::ensure!(harness.service.find_task(task.id()).await.is_none());
    Ok(())
}
