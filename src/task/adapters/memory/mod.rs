//! In-memory adapters for task persistence.

mod store;

pub use store::InMemorySnapshotStore;
