//! Export of a filtered task view as a JSON document.

use crate::task::domain::{Task, TaskFilter};
use chrono::NaiveDate;

/// Prefix of every export file name.
pub const EXPORT_FILE_PREFIX: &str = "taskkeep";

/// A rendered export ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskExport {
    file_name: String,
    contents: String,
    task_count: usize,
}

impl TaskExport {
    /// Renders `tasks` as pretty-printed JSON named after `filter` and `date`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a task cannot be encoded.
    pub(crate) fn render(
        tasks: &[&Task],
        filter: TaskFilter,
        date: NaiveDate,
    ) -> Result<Self, serde_json::Error> {
        let contents = serde_json::to_string_pretty(tasks)?;
        Ok(Self {
            file_name: export_file_name(filter, date),
            contents,
            task_count: tasks.len(),
        })
    }

    /// Returns the suggested file name, e.g. `taskkeep-pending-2026-10-19.json`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the JSON document.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Returns how many tasks the document holds.
    #[must_use]
    pub const fn task_count(&self) -> usize {
        self.task_count
    }
}

/// Builds the export file name for `filter` on `date`.
#[must_use]
pub fn export_file_name(filter: TaskFilter, date: NaiveDate) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}-{filter}-{}.json",
        date.format("%Y-%m-%d")
    )
}
