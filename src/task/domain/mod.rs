//! Domain model for the task lifecycle and retention engine.
//!
//! The domain covers task content and completion rules, due-date expiry,
//! the soft-delete retention window, the in-memory task board, and the
//! query engine. All infrastructure concerns stay outside this boundary;
//! time enters only through an injected [`mockable::Clock`].

mod board;
mod deleted;
mod draft;
mod error;
mod ids;
mod priority;
mod query;
mod task;

pub use board::{DeleteScope, TaskBoard};
pub use deleted::{DeletedTask, RETENTION_DAYS, retention_window};
pub use draft::TaskDraft;
pub use error::{ParseTaskFilterError, TaskDomainError};
pub use ids::{Category, TaskId, TaskTitle};
pub use priority::Priority;
pub use query::{ProgressBand, TaskFilter, TaskQuery, TaskStats};
pub use task::{Task, current_date};
