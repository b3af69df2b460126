//! Task aggregate root and its lifecycle rules.

use super::{Category, Priority, TaskDomainError, TaskDraft, TaskId, TaskTitle};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Returns the calendar date used for expiry and date filters.
///
/// Dates are compared in UTC so that expiry does not depend on the host
/// time zone.
#[must_use]
pub fn current_date(clock: &impl Clock) -> NaiveDate {
    clock.utc().date_naive()
}

/// Task aggregate root.
///
/// Completion is stored only as `completed_at`; a task is completed exactly
/// when that timestamp is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: String,
    priority: Priority,
    category: Category,
    due_date: Option<NaiveDate>,
    important: bool,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new incomplete task from validated draft content.
    #[must_use]
    pub fn new(id: TaskId, draft: TaskDraft, clock: &impl Clock) -> Self {
        let TaskDraft {
            title,
            description,
            priority,
            category,
            due_date,
            important,
        } = draft;
        Self {
            id,
            title,
            description,
            priority,
            category,
            due_date,
            important,
            created_at: clock.utc(),
            completed_at: None,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the category label.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the informational importance flag.
    #[must_use]
    pub const fn important(&self) -> bool {
        self.important
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, present only for completed tasks.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns whether the due date lies strictly before `today`.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today)
    }

    /// Returns whether the task is expired according to `clock`.
    #[must_use]
    pub fn is_expired(&self, clock: &impl Clock) -> bool {
        self.is_expired_on(current_date(clock))
    }

    /// Returns whether the task is expired and incomplete, which freezes it.
    #[must_use]
    pub fn is_locked_on(&self, today: NaiveDate) -> bool {
        !self.completed() && self.is_expired_on(today)
    }

    /// Replaces every editable field and reconciles the completion timestamp.
    ///
    /// `completed_at` is stamped when completion turns on, cleared when it
    /// turns off, and kept otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::Expired`] when the task is expired and
    /// incomplete. The task is left untouched in that case.
    pub fn edit(
        &mut self,
        draft: TaskDraft,
        completed: bool,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_unlocked(clock)?;
        let TaskDraft {
            title,
            description,
            priority,
            category,
            due_date,
            important,
        } = draft;
        self.title = title;
        self.description = description;
        self.priority = priority;
        self.category = category;
        self.due_date = due_date;
        self.important = important;
        self.set_completed(completed, clock);
        Ok(())
    }

    /// Flips the completion state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::Expired`] when the task is expired and
    /// incomplete; expired work cannot be marked done after the fact.
    pub fn toggle_completion(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_unlocked(clock)?;
        self.set_completed(!self.completed(), clock);
        Ok(())
    }

    /// Returns a draft carrying the current editable content.
    #[must_use]
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            category: self.category.clone(),
            due_date: self.due_date,
            important: self.important,
        }
    }

    fn ensure_unlocked(&self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.is_locked_on(current_date(clock)) {
            return Err(TaskDomainError::Expired(self.id));
        }
        Ok(())
    }

    fn set_completed(&mut self, completed: bool, clock: &impl Clock) {
        match (self.completed(), completed) {
            (false, true) => self.completed_at = Some(clock.utc()),
            (true, false) => self.completed_at = None,
            _ => {}
        }
    }
}

/// Storage shape of a task.
///
/// The record keeps an explicit `completed` flag next to `completedAt`;
/// both must agree for the record to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    important: bool,
    completed: bool,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskDomainError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        if record.completed != record.completed_at.is_some() {
            return Err(TaskDomainError::CompletionMismatch(record.id));
        }
        Ok(Self {
            id: record.id,
            title: TaskTitle::new(record.title)?,
            description: record.description,
            priority: record.priority,
            category: record.category,
            due_date: record.due_date,
            important: record.important,
            created_at: record.created_at,
            completed_at: record.completed_at,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            completed: task.completed(),
            title: task.title.into(),
            description: task.description,
            priority: task.priority,
            category: task.category,
            due_date: task.due_date,
            important: task.important,
            created_at: task.created_at,
            completed_at: task.completed_at,
        }
    }
}
