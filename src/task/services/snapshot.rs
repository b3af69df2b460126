//! Encoding of the task board into the two persisted records.

use crate::task::{
    domain::{DeletedTask, Task, TaskBoard, TaskId},
    ports::{TaskSnapshotStore, TaskStoreError, TaskStoreResult},
};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

/// Key of the record holding active tasks.
pub const ACTIVE_TASKS_KEY: &str = "tasks.active";

/// Key of the record holding soft-deleted tasks.
pub const DELETED_TASKS_KEY: &str = "tasks.deleted";

/// Which records a mutation has to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dirty {
    Active,
    Deleted,
    Both,
}

impl Dirty {
    const fn active(self) -> bool {
        matches!(self, Self::Active | Self::Both)
    }

    const fn deleted(self) -> bool {
        matches!(self, Self::Deleted | Self::Both)
    }
}

/// Loads both collections; a missing record is an empty collection.
///
/// Returns the board along with identifiers dropped as duplicates.
pub(crate) async fn load_board<S>(store: &S) -> TaskStoreResult<(TaskBoard, Vec<TaskId>)>
where
    S: TaskSnapshotStore + ?Sized,
{
    let active: Vec<Task> = read_collection(store, ACTIVE_TASKS_KEY).await?;
    let deleted: Vec<DeletedTask> = read_collection(store, DELETED_TASKS_KEY).await?;
    Ok(TaskBoard::from_parts(active, deleted))
}

/// Rewrites the records selected by `dirty` from the board contents.
pub(crate) async fn save_board<S>(store: &S, board: &TaskBoard, dirty: Dirty) -> TaskStoreResult<()>
where
    S: TaskSnapshotStore + ?Sized,
{
    if dirty.active() {
        write_collection(store, ACTIVE_TASKS_KEY, board.active()).await?;
    }
    if dirty.deleted() {
        write_collection(store, DELETED_TASKS_KEY, board.deleted()).await?;
    }
    Ok(())
}

async fn read_collection<S, T>(store: &S, key: &'static str) -> TaskStoreResult<Vec<T>>
where
    S: TaskSnapshotStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(text) = store.read(key).await? else {
        return Ok(Vec::new());
    };
    serde_json::from_str(&text).map_err(|err| TaskStoreError::Decode {
        key,
        source: Arc::new(err),
    })
}

async fn write_collection<S, T>(store: &S, key: &'static str, items: &[T]) -> TaskStoreResult<()>
where
    S: TaskSnapshotStore + ?Sized,
    T: Serialize + Sync,
{
    let text = serde_json::to_string(items).map_err(|err| TaskStoreError::Encode {
        key,
        source: Arc::new(err),
    })?;
    store.write(key, &text).await
}
