//! Filesystem adapters for task persistence.

mod store;

pub use store::FileSnapshotStore;
