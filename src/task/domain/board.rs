//! In-memory task store holding the active and deleted collections.

use super::{DeletedTask, Task, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Which active tasks a soft delete applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteScope {
    /// Every active task.
    All,
    /// Only the listed tasks; identifiers that are not active are skipped.
    Ids(Vec<TaskId>),
}

impl DeleteScope {
    /// Scope targeting a single task.
    #[must_use]
    pub fn single(id: TaskId) -> Self {
        Self::Ids(vec![id])
    }

    fn includes(&self, ids: &HashSet<TaskId>, id: TaskId) -> bool {
        match self {
            Self::All => true,
            Self::Ids(_) => ids.contains(&id),
        }
    }
}

/// Ordered active tasks (most recent first) and deleted tasks (in deletion
/// order).
///
/// An identifier lives in at most one of the two collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    active: Vec<Task>,
    deleted: Vec<DeletedTask>,
}

impl TaskBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from loaded collections.
    ///
    /// When an identifier repeats, the first occurrence wins and active
    /// tasks are read before deleted ones. Dropped identifiers are returned
    /// so the caller can report them.
    #[must_use]
    pub fn from_parts(active: Vec<Task>, deleted: Vec<DeletedTask>) -> (Self, Vec<TaskId>) {
        let mut seen = HashSet::new();
        let mut dropped = Vec::new();
        let mut board = Self::new();
        for task in active {
            if seen.insert(task.id()) {
                board.active.push(task);
            } else {
                dropped.push(task.id());
            }
        }
        for deleted_task in deleted {
            if seen.insert(deleted_task.id()) {
                board.deleted.push(deleted_task);
            } else {
                dropped.push(deleted_task.id());
            }
        }
        (board, dropped)
    }

    /// Returns the active tasks, most recent first.
    #[must_use]
    pub fn active(&self) -> &[Task] {
        &self.active
    }

    /// Returns the deleted tasks in the order they were deleted.
    #[must_use]
    pub fn deleted(&self) -> &[DeletedTask] {
        &self.deleted
    }

    /// Returns the active task with the given identifier.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.active.iter().find(|task| task.id() == id)
    }

    /// Returns the active task with the given identifier for mutation.
    pub fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.active.iter_mut().find(|task| task.id() == id)
    }

    /// Returns whether the identifier is present in either collection.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.find(id).is_some() || self.deleted.iter().any(|task| task.id() == id)
    }

    /// Picks an identifier for a task created at `created_at`.
    ///
    /// The timestamp-derived candidate is used unless an equal or later
    /// identifier has already been issued, in which case the next value
    /// above the highest issued identifier is used.
    #[must_use]
    pub fn next_id(&self, created_at: DateTime<Utc>) -> TaskId {
        let candidate = TaskId::from_timestamp(created_at);
        let highest = self
            .active
            .iter()
            .map(Task::id)
            .chain(self.deleted.iter().map(DeletedTask::id))
            .max();
        match highest {
            Some(highest) if highest >= candidate => highest.successor(),
            _ => candidate,
        }
    }

    /// Inserts a new task at the front of the active collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DuplicateId`] when the identifier is
    /// already active or deleted; the board is left unchanged.
    pub fn insert(&mut self, task: Task) -> Result<(), TaskDomainError> {
        if self.contains(task.id()) {
            return Err(TaskDomainError::DuplicateId(task.id()));
        }
        self.active.insert(0, task);
        Ok(())
    }

    /// Moves the tasks in `scope` to the deleted collection.
    ///
    /// Tasks keep their relative active order when appended. Returns the
    /// identifiers that were moved.
    pub fn soft_delete(&mut self, scope: &DeleteScope, deleted_at: DateTime<Utc>) -> Vec<TaskId> {
        let targets: HashSet<TaskId> = match scope {
            DeleteScope::All => HashSet::new(),
            DeleteScope::Ids(ids) => ids.iter().copied().collect(),
        };
        let (removed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|task| scope.includes(&targets, task.id()));
        self.active = kept;
        let moved = removed.iter().map(Task::id).collect();
        self.deleted.extend(
            removed
                .into_iter()
                .map(|task| DeletedTask::new(task, deleted_at)),
        );
        moved
    }

    /// Moves the listed deleted tasks back to the front of the active
    /// collection.
    ///
    /// Tasks are taken in deletion order and each is placed in front of
    /// the previous one. Unknown identifiers are skipped. Returns the
    /// identifiers that were restored.
    pub fn restore(&mut self, ids: &[TaskId]) -> Vec<TaskId> {
        let targets: HashSet<TaskId> = ids.iter().copied().collect();
        let (restored, kept): (Vec<DeletedTask>, Vec<DeletedTask>) =
            std::mem::take(&mut self.deleted)
                .into_iter()
                .partition(|task| targets.contains(&task.id()));
        self.deleted = kept;
        let mut restored_ids = Vec::with_capacity(restored.len());
        for deleted_task in restored {
            restored_ids.push(deleted_task.id());
            self.active.insert(0, deleted_task.restore());
        }
        restored_ids
    }

    /// Erases the listed deleted tasks regardless of their retention window.
    ///
    /// Returns how many tasks were erased.
    pub fn purge(&mut self, ids: &[TaskId]) -> usize {
        let targets: HashSet<TaskId> = ids.iter().copied().collect();
        self.erase_deleted(|task| targets.contains(&task.id()))
    }

    /// Erases every deleted task whose retention window has elapsed at
    /// `now`.
    ///
    /// Returns how many tasks were erased.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        self.erase_deleted(|task| task.is_due_for_purge(now))
    }

    fn erase_deleted(&mut self, mut should_erase: impl FnMut(&DeletedTask) -> bool) -> usize {
        let before = self.deleted.len();
        self.deleted.retain(|task| !should_erase(task));
        before.saturating_sub(self.deleted.len())
    }
}
