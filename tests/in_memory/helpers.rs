//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use crate::test_helpers::ManualClock;
use rstest::fixture;
use taskkeep::task::{
    adapters::memory::InMemorySnapshotStore,
    domain::{Task, TaskId},
    services::TaskLifecycleService,
};

/// Service type used by the in-memory integration tests.
pub type TestService = TaskLifecycleService<InMemorySnapshotStore, ManualClock>;

/// Service together with the handles a test needs to steer it.
pub struct Harness {
    pub service: TestService,
    pub store: InMemorySnapshotStore,
    pub clock: Arc<ManualClock>,
}

/// Provides a service over an empty store with a manual clock.
#[fixture]
pub fn harness() -> Harness {
    let store = InMemorySnapshotStore::new();
    let clock = Arc::new(ManualClock::default());
    let service = TaskLifecycleService::new(Arc::new(store.clone()), Arc::clone(&clock));
    Harness {
        service,
        store,
        clock,
    }
}

/// Returns the identifiers of `tasks` in order.
pub fn ids_of(tasks: &[Task]) -> Vec<TaskId> {
    tasks.iter().map(Task::id).collect()
}
