//! Soft-deleted tasks held in the retention window.

use super::task::TaskRecord;
use super::{Task, TaskDomainError, TaskId};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of days a soft-deleted task stays restorable.
pub const RETENTION_DAYS: i64 = 30;

/// Returns the retention window as a duration.
#[must_use]
pub const fn retention_window() -> Duration {
    Duration::days(RETENTION_DAYS)
}

/// A task moved out of the active list, awaiting restore or purge.
///
/// The purge time is always derived from `deleted_at`, so it cannot drift
/// from the retention window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeletedTaskRecord", into = "DeletedTaskRecord")]
pub struct DeletedTask {
    task: Task,
    deleted_at: DateTime<Utc>,
}

impl DeletedTask {
    /// Soft-deletes `task` at `deleted_at`.
    #[must_use]
    pub const fn new(task: Task, deleted_at: DateTime<Utc>) -> Self {
        Self { task, deleted_at }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.task.id()
    }

    /// Returns the task as it was when deleted.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns when the task was soft-deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> DateTime<Utc> {
        self.deleted_at
    }

    /// Returns when the task becomes eligible for permanent removal.
    #[must_use]
    pub fn permanent_delete_at(&self) -> DateTime<Utc> {
        self.deleted_at + retention_window()
    }

    /// Returns whether the retention window has elapsed at `now`.
    #[must_use]
    pub fn is_due_for_purge(&self, now: DateTime<Utc>) -> bool {
        self.permanent_delete_at() <= now
    }

    /// Returns whether the underlying task is past its due date.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.task.is_expired_on(today)
    }

    /// Rebuilds the active task, dropping the retention fields.
    #[must_use]
    pub fn restore(self) -> Task {
        self.task
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletedTaskRecord {
    #[serde(flatten)]
    task: TaskRecord,
    deleted_at: DateTime<Utc>,
    permanent_delete_at: DateTime<Utc>,
}

impl TryFrom<DeletedTaskRecord> for DeletedTask {
    type Error = TaskDomainError;

    fn try_from(record: DeletedTaskRecord) -> Result<Self, Self::Error> {
        let task = Task::try_from(record.task)?;
        if record.permanent_delete_at - record.deleted_at != retention_window() {
            return Err(TaskDomainError::RetentionMismatch(task.id()));
        }
        Ok(Self::new(task, record.deleted_at))
    }
}

impl From<DeletedTask> for DeletedTaskRecord {
    fn from(deleted: DeletedTask) -> Self {
        let permanent_delete_at = deleted.permanent_delete_at();
        Self {
            task: deleted.task.into(),
            deleted_at: deleted.deleted_at,
            permanent_delete_at,
        }
    }
}
