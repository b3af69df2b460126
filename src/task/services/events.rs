//! Change notifications published after each mutation.

use crate::task::domain::TaskId;

/// What changed on the task board.
///
/// Published after the in-memory mutation, whether or not persistence
/// succeeded, so views can always refresh from the authoritative state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    /// A task was created.
    Created(TaskId),
    /// A task's content was replaced.
    Edited(TaskId),
    /// A task's completion state flipped.
    CompletionToggled {
        /// Task that changed.
        id: TaskId,
        /// Completion state after the toggle.
        completed: bool,
    },
    /// Tasks moved to the deleted collection.
    SoftDeleted(Vec<TaskId>),
    /// Tasks moved back to the active collection.
    Restored(Vec<TaskId>),
    /// Deleted tasks were erased on request.
    Purged(usize),
    /// Deleted tasks were erased because their retention window elapsed.
    Swept(usize),
}

/// Capacity of the change notification channel.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;
