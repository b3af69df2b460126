//! Directory-backed snapshot store.
//!
//! Each key is stored as `<key>.json` inside one directory. Writes go to a
//! temporary sibling first and are renamed into place, so a crash mid-write
//! leaves the previous record intact. Filesystem calls run on the blocking
//! thread pool.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use crate::task::ports::{TaskSnapshotStore, TaskStoreError, TaskStoreResult};

const RECORD_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

/// Snapshot store keeping one JSON file per key in a directory.
#[derive(Debug)]
pub struct FileSnapshotStore {
    root: Utf8PathBuf,
    dir: Arc<Dir>,
}

impl FileSnapshotStore {
    /// Opens the store rooted at `path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Backend`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> TaskStoreResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(TaskStoreError::backend)?;
        let dir =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(TaskStoreError::backend)?;
        Ok(Self {
            root: path.to_owned(),
            dir: Arc::new(dir),
        })
    }

    /// Returns the directory this store writes to.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Runs a filesystem operation against the store directory on the blocking
/// thread pool.
async fn run_blocking<F, T>(dir: &Arc<Dir>, f: F) -> TaskStoreResult<T>
where
    F: FnOnce(&Dir) -> TaskStoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let dir = Arc::clone(dir);
    tokio::task::spawn_blocking(move || f(&dir))
        .await
        .map_err(TaskStoreError::backend)?
}

/// Maps a key to its file name, rejecting keys that could escape the
/// directory.
fn record_file_name(key: &str) -> TaskStoreResult<String> {
    let is_valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'));
    if !is_valid {
        return Err(TaskStoreError::backend(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid snapshot key '{key}'"),
        )));
    }
    Ok(format!("{key}.{RECORD_EXTENSION}"))
}

#[async_trait]
impl TaskSnapshotStore for FileSnapshotStore {
    async fn read(&self, key: &str) -> TaskStoreResult<Option<String>> {
        let file_name = record_file_name(key)?;
        run_blocking(&self.dir, move |dir| match dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(TaskStoreError::backend(err)),
        })
        .await
    }

    async fn write(&self, key: &str, value: &str) -> TaskStoreResult<()> {
        let file_name = record_file_name(key)?;
        let temp_name = format!("{file_name}.{TEMP_SUFFIX}");
        let contents = value.to_owned();
        run_blocking(&self.dir, move |dir| {
            dir.write(&temp_name, contents)
                .map_err(TaskStoreError::backend)?;
            dir.rename(&temp_name, dir, &file_name)
                .map_err(TaskStoreError::backend)
        })
        .await
    }
}
