//! Error types for task domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task is past its due date and still incomplete, so it is locked.
    #[error("task {0} has expired and can no longer be edited or completed")]
    Expired(TaskId),

    /// The identifier is already held by an active or deleted task.
    #[error("task id {0} is already in use")]
    DuplicateId(TaskId),

    /// The priority value is not one of `low`, `medium` or `high`.
    #[error("unsupported task priority: {0}")]
    InvalidPriority(String),

    /// A persisted record disagrees with itself about completion.
    #[error("task {0} has a completion flag that disagrees with its completion timestamp")]
    CompletionMismatch(TaskId),

    /// A persisted deleted record does not carry the standard retention window.
    #[error("deleted task {0} has a purge time that does not match its retention window")]
    RetentionMismatch(TaskId),
}

/// Error returned while parsing a filter name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task filter: {0}")]
pub struct ParseTaskFilterError(pub String);
