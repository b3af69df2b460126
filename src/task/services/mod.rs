//! Application services for task lifecycle orchestration.

mod events;
mod export;
mod lifecycle;
mod snapshot;
mod sweeper;

pub use events::TaskChange;
pub use export::{EXPORT_FILE_PREFIX, TaskExport, export_file_name};
pub use lifecycle::{
    CreateTaskRequest, EditTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
pub use snapshot::{ACTIVE_TASKS_KEY, DELETED_TASKS_KEY};
pub use sweeper::{DEFAULT_SWEEP_INTERVAL, RetentionSweeper, SweeperHandle};
