//! Service layer for the task lifecycle: creation, editing, completion,
//! soft deletion, restoration, purging and queries.

use super::events::{CHANGE_CHANNEL_CAPACITY, TaskChange};
use super::export::TaskExport;
use super::snapshot::{self, Dirty};
use crate::task::{
    domain::{
        Category, DeleteScope, DeletedTask, Priority, Task, TaskBoard, TaskDomainError, TaskDraft,
        TaskFilter, TaskId, TaskQuery, TaskStats, current_date,
    },
    ports::{TaskSnapshotStore, TaskStoreError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
    due_date: Option<NaiveDate>,
    important: bool,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            category: None,
            due_date: None,
            important: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority; `Medium` is used otherwise.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the category; `"General"` is used when absent or blank.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Marks the task as important.
    #[must_use]
    pub const fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    fn into_draft(self) -> Result<TaskDraft, TaskDomainError> {
        Ok(TaskDraft::new(self.title)?
            .with_description(self.description.unwrap_or_default())
            .with_priority(self.priority.unwrap_or_default())
            .with_category(Category::new(self.category.unwrap_or_default()))
            .with_due_date(self.due_date)
            .with_important(self.important))
    }
}

/// Request payload replacing every editable field of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTaskRequest {
    id: TaskId,
    title: String,
    description: String,
    priority: Priority,
    category: String,
    due_date: Option<NaiveDate>,
    important: bool,
    completed: bool,
}

impl EditTaskRequest {
    /// Creates a request with the given title and default values for the
    /// remaining fields.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            category: String::new(),
            due_date: None,
            important: false,
            completed: false,
        }
    }

    /// Creates a request pre-filled with the task's current content.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            priority: task.priority(),
            category: task.category().as_str().to_owned(),
            due_date: task.due_date(),
            important: task.important(),
            completed: task.completed(),
        }
    }

    /// Returns the target task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the importance flag.
    #[must_use]
    pub const fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// Sets the completion state.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    fn into_parts(self) -> Result<(TaskDraft, bool), TaskDomainError> {
        let draft = TaskDraft::new(self.title)?
            .with_description(self.description)
            .with_priority(self.priority)
            .with_category(Category::new(self.category))
            .with_due_date(self.due_date)
            .with_important(self.important);
        Ok((draft, self.completed))
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed or the task is locked by expiry.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The targeted task is not in the expected collection.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Loading or saving snapshots failed.
    ///
    /// For mutations the in-memory change has already been applied.
    #[error(transparent)]
    Persistence(#[from] TaskStoreError),

    /// The requested export view holds no tasks.
    #[error("no tasks match the '{0}' view; nothing to export")]
    NothingToExport(TaskFilter),

    /// The export document could not be encoded.
    #[error("failed to encode export: {0}")]
    ExportEncoding(#[source] serde_json::Error),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Owns the task board behind a single mutex. Every operation, including
/// the write-back to the snapshot store, runs while holding it, so the
/// retention sweeper never interleaves with a user mutation. Clones share
/// the same board.
pub struct TaskLifecycleService<S, C>
where
    S: TaskSnapshotStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    board: Arc<Mutex<TaskBoard>>,
    changes: broadcast::Sender<TaskChange>,
}

impl<S, C> Clone for TaskLifecycleService<S, C>
where
    S: TaskSnapshotStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            board: Arc::clone(&self.board),
            changes: self.changes.clone(),
        }
    }
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskSnapshotStore,
    C: Clock + Send + Sync,
{
    /// Creates a service with an empty board.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_board(store, clock, TaskBoard::new())
    }

    /// Creates a service from the collections persisted in `store`.
    ///
    /// Missing records load as empty collections. Identifiers present in
    /// both collections keep the active copy.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Persistence`] when a record cannot be
    /// read or decoded.
    pub async fn load(store: Arc<S>, clock: Arc<C>) -> TaskLifecycleResult<Self> {
        let (board, dropped) = snapshot::load_board(&*store).await?;
        for id in dropped {
            warn!(task_id = %id, "dropped duplicate task identifier while loading");
        }
        info!(
            active = board.active().len(),
            deleted = board.deleted().len(),
            "task board loaded"
        );
        Ok(Self::with_board(store, clock, board))
    }

    fn with_board(store: Arc<S>, clock: Arc<C>, board: TaskBoard) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            store,
            clock,
            board: Arc::new(Mutex::new(board)),
            changes,
        }
    }

    /// Subscribes to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TaskChange> {
        self.changes.subscribe()
    }

    /// Creates a task and places it first in the active list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] (wrapped) when the title is
    /// blank, leaving the board unchanged,
    /// [`TaskDomainError::DuplicateId`] if the chosen identifier is taken, or
    /// [`TaskLifecycleError::Persistence`] when the write-back fails.
    pub async fn add_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let draft = request.into_draft()?;
        let mut board = self.board.lock().await;
        let id = board.next_id(self.clock.utc());
        let task = Task::new(id, draft, &*self.clock);
        board.insert(task.clone())?;
        info!(task_id = %id, "task created");
        self.publish(TaskChange::Created(id));
        self.persist(&board, Dirty::Active).await?;
        Ok(task)
    }

    /// Replaces the editable content of an active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is not active,
    /// [`TaskDomainError::Expired`] when it is expired and incomplete,
    /// [`TaskDomainError::EmptyTitle`] when the new title is blank, or
    /// [`TaskLifecycleError::Persistence`] when the write-back fails.
    pub async fn edit_task(&self, request: EditTaskRequest) -> TaskLifecycleResult<Task> {
        let id = request.id();
        let today = current_date(&*self.clock);
        let mut board = self.board.lock().await;
        let task = board
            .find_mut(id)
            .ok_or(TaskLifecycleError::NotFound(id))?;
        if task.is_locked_on(today) {
            return Err(TaskDomainError::Expired(id).into());
        }
        let (draft, completed) = request.into_parts()?;
        task.edit(draft, completed, &*self.clock)?;
        let edited = task.clone();
        info!(task_id = %id, completed = edited.completed(), "task edited");
        self.publish(TaskChange::Edited(id));
        self.persist(&board, Dirty::Active).await?;
        Ok(edited)
    }

    /// Flips the completion state of an active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is not active,
    /// [`TaskDomainError::Expired`] when it is expired and incomplete (the
    /// task is not changed), or [`TaskLifecycleError::Persistence`] when the
    /// write-back fails.
    pub async fn toggle_completion(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut board = self.board.lock().await;
        let task = board
            .find_mut(id)
            .ok_or(TaskLifecycleError::NotFound(id))?;
        if let Err(err) = task.toggle_completion(&*self.clock) {
            debug!(task_id = %id, "completion toggle rejected for expired task");
            return Err(err.into());
        }
        let toggled = task.clone();
        info!(task_id = %id, completed = toggled.completed(), "task completion toggled");
        self.publish(TaskChange::CompletionToggled {
            id,
            completed: toggled.completed(),
        });
        self.persist(&board, Dirty::Active).await?;
        Ok(toggled)
    }

    /// Soft-deletes a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is not active,
    /// or [`TaskLifecycleError::Persistence`] when the write-back fails.
    pub async fn delete_task(&self, id: TaskId) -> TaskLifecycleResult<DeletedTask> {
        let mut board = self.board.lock().await;
        if board.find(id).is_none() {
            return Err(TaskLifecycleError::NotFound(id));
        }
        board.soft_delete(&DeleteScope::single(id), self.clock.utc());
        let deleted = board
            .deleted()
            .last()
            .cloned()
            .ok_or(TaskLifecycleError::NotFound(id))?;
        info!(task_id = %id, purge_at = %deleted.permanent_delete_at(), "task soft-deleted");
        self.publish(TaskChange::SoftDeleted(vec![id]));
        self.persist(&board, Dirty::Both).await?;
        Ok(deleted)
    }

    /// Soft-deletes every task in `scope`, skipping identifiers that are not
    /// active.
    ///
    /// Returns how many tasks were moved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Persistence`] when the write-back fails.
    pub async fn soft_delete(&self, scope: DeleteScope) -> TaskLifecycleResult<usize> {
        let mut board = self.board.lock().await;
        let moved = board.soft_delete(&scope, self.clock.utc());
        if moved.is_empty() {
            debug!("soft delete matched no active tasks");
            return Ok(0);
        }
        let count = moved.len();
        info!(count, all = matches!(scope, DeleteScope::All), "tasks soft-deleted");
        self.publish(TaskChange::SoftDeleted(moved));
        self.persist(&board, Dirty::Both).await?;
        Ok(count)
    }

    /// Restores deleted tasks to the front of the active list, skipping
    /// identifiers that are not in the deleted collection.
    ///
    /// Returns how many tasks were restored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Persistence`] when the write-back fails.
    pub async fn restore(&self, ids: &[TaskId]) -> TaskLifecycleResult<usize> {
        let mut board = self.board.lock().await;
        let restored = board.restore(ids);
        if restored.is_empty() {
            debug!("restore matched no deleted tasks");
            return Ok(0);
        }
        let count = restored.len();
        info!(count, "tasks restored");
        self.publish(TaskChange::Restored(restored));
        self.persist(&board, Dirty::Both).await?;
        Ok(count)
    }

    /// Permanently erases deleted tasks without waiting for their retention
    /// window.
    ///
    /// Returns how many tasks were erased.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Persistence`] when the write-back fails.
    pub async fn purge_now(&self, ids: &[TaskId]) -> TaskLifecycleResult<usize> {
        let mut board = self.board.lock().await;
        let count = board.purge(ids);
        if count == 0 {
            debug!("purge matched no deleted tasks");
            return Ok(0);
        }
        info!(count, "deleted tasks purged");
        self.publish(TaskChange::Purged(count));
        self.persist(&board, Dirty::Deleted).await?;
        Ok(count)
    }

    /// Erases deleted tasks whose retention window has elapsed.
    ///
    /// Persists only when something was erased. Returns how many tasks were
    /// erased.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Persistence`] when the write-back fails.
    pub async fn sweep_expired(&self) -> TaskLifecycleResult<usize> {
        let mut board = self.board.lock().await;
        let count = board.sweep(self.clock.utc());
        if count == 0 {
            debug!("retention sweep found nothing to purge");
            return Ok(0);
        }
        info!(count, "retention sweep purged deleted tasks");
        self.publish(TaskChange::Swept(count));
        self.persist(&board, Dirty::Deleted).await?;
        Ok(count)
    }

    /// Rewrites both records from the current in-memory state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Persistence`] when a write fails.
    pub async fn flush(&self) -> TaskLifecycleResult<()> {
        let board = self.board.lock().await;
        self.persist(&board, Dirty::Both).await
    }

    /// Returns the active task with the given identifier.
    pub async fn find_task(&self, id: TaskId) -> Option<Task> {
        self.board.lock().await.find(id).cloned()
    }

    /// Returns every active task, most recent first.
    pub async fn active_tasks(&self) -> Vec<Task> {
        self.board.lock().await.active().to_vec()
    }

    /// Returns every deleted task in deletion order.
    pub async fn deleted_tasks(&self) -> Vec<DeletedTask> {
        self.board.lock().await.deleted().to_vec()
    }

    /// Returns the active tasks matching `query`, in active order.
    pub async fn filter(&self, query: &TaskQuery) -> Vec<Task> {
        let today = current_date(&*self.clock);
        let board = self.board.lock().await;
        query
            .apply(board.active(), today)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns summary statistics over all active tasks.
    pub async fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(self.board.lock().await.active())
    }

    /// Renders the tasks matching `query` as a JSON export.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NothingToExport`] when no task matches,
    /// or [`TaskLifecycleError::ExportEncoding`] when encoding fails.
    pub async fn export(&self, query: &TaskQuery) -> TaskLifecycleResult<TaskExport> {
        let today = current_date(&*self.clock);
        let board = self.board.lock().await;
        let visible = query.apply(board.active(), today);
        if visible.is_empty() {
            return Err(TaskLifecycleError::NothingToExport(query.filter()));
        }
        let export = TaskExport::render(&visible, query.filter(), today)
            .map_err(TaskLifecycleError::ExportEncoding)?;
        info!(
            count = export.task_count(),
            filter = %query.filter(),
            "tasks exported"
        );
        Ok(export)
    }

    fn publish(&self, change: TaskChange) {
        if self.changes.send(change).is_err() {
            debug!("no change subscribers");
        }
    }

    async fn persist(&self, board: &TaskBoard, dirty: Dirty) -> TaskLifecycleResult<()> {
        if let Err(err) = snapshot::save_board(&*self.store, board, dirty).await {
            warn!(error = %err, "failed to persist task board; in-memory state kept");
            return Err(err.into());
        }
        Ok(())
    }
}
