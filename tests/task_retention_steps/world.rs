//! Shared world state for task retention BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::ManualClock;
use rstest::fixture;
use taskkeep::task::{
    adapters::memory::InMemorySnapshotStore,
    domain::{DeletedTask, Task},
    services::{TaskLifecycleError, TaskLifecycleService},
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemorySnapshotStore, ManualClock>;

/// Scenario world for task retention behaviour tests.
pub struct TaskRetentionWorld {
    pub service: TestTaskService,
    pub clock: Arc<ManualClock>,
    pub last_created_task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
    pub last_purged: Option<usize>,
    pub last_view: Vec<Task>,
}

impl TaskRetentionWorld {
    /// Creates a world with an empty board.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::default());
        let service = TaskLifecycleService::new(
            Arc::new(InMemorySnapshotStore::new()),
            Arc::clone(&clock),
        );

        Self {
            service,
            clock,
            last_created_task: None,
            last_result: None,
            last_purged: None,
            last_view: Vec::new(),
        }
    }

    /// Finds an active or deleted task by title.
    pub fn task_titled(&self, title: &str) -> Result<Task, eyre::Report> {
        let active = run_async(self.service.active_tasks());
        let deleted = run_async(self.service.deleted_tasks());
        active
            .into_iter()
            .chain(deleted.into_iter().map(DeletedTask::restore))
            .find(|task| task.title().as_str() == title)
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} in scenario world"))
    }

    /// Returns the task created most recently in the scenario.
    pub fn last_task(&self) -> Result<&Task, eyre::Report> {
        self.last_created_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }
}

impl Default for TaskRetentionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskRetentionWorld {
    TaskRetentionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Returns the titles of `tasks` in order.
pub fn titles(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect()
}
