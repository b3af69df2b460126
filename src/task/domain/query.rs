//! Filtering, search and summary statistics over active tasks.

use super::{ParseTaskFilterError, Priority, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named predicate selecting a subset of active tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    /// Every task.
    #[default]
    All,
    /// Tasks not yet completed.
    Pending,
    /// Completed tasks.
    Completed,
    /// High-priority tasks.
    High,
    /// Tasks due exactly today.
    Today,
    /// Incomplete tasks whose due date has passed.
    Expired,
}

impl TaskFilter {
    /// Every filter, in display order.
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::Pending,
        Self::Completed,
        Self::High,
        Self::Today,
        Self::Expired,
    ];

    /// Returns the canonical filter name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::High => "high",
            Self::Today => "today",
            Self::Expired => "expired",
        }
    }

    /// Returns whether `task` satisfies this filter on `today`.
    #[must_use]
    pub fn matches(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed(),
            Self::Completed => task.completed(),
            Self::High => task.priority() == Priority::High,
            Self::Today => task.due_date() == Some(today),
            Self::Expired => task.is_locked_on(today),
        }
    }
}

impl TryFrom<&str> for TaskFilter {
    type Error = ParseTaskFilterError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == normalized)
            .ok_or_else(|| ParseTaskFilterError(value.to_owned()))
    }
}

impl std::str::FromStr for TaskFilter {
    type Err = ParseTaskFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A filter plus an optional free-text search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    filter: TaskFilter,
    search: String,
}

impl TaskQuery {
    /// Creates a query for `filter` with no search term.
    #[must_use]
    pub const fn new(filter: TaskFilter) -> Self {
        Self {
            filter,
            search: String::new(),
        }
    }

    /// Sets the search term. An empty term disables search.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Returns the filter.
    #[must_use]
    pub const fn filter(&self) -> TaskFilter {
        self.filter
    }

    /// Returns the search term.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the matching tasks in their original order.
    ///
    /// The predicate runs first; the search then keeps tasks whose title,
    /// description or category contains the term, ignoring case.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
        let term = self.search.to_lowercase();
        tasks
            .iter()
            .filter(|task| self.filter.matches(task, today))
            .filter(|task| term.is_empty() || matches_search(task, &term))
            .collect()
    }
}

impl From<TaskFilter> for TaskQuery {
    fn from(filter: TaskFilter) -> Self {
        Self::new(filter)
    }
}

fn matches_search(task: &Task, lowered_term: &str) -> bool {
    [
        task.title().as_str(),
        task.description(),
        task.category().as_str(),
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(lowered_term))
}

/// Coarse completion level used to colour progress indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    /// Below 30 percent.
    Low,
    /// From 30 up to but excluding 70 percent.
    Mid,
    /// 70 percent or more.
    High,
}

impl ProgressBand {
    /// Lowest percentage in the mid band.
    pub const MID_THRESHOLD: u8 = 30;
    /// Lowest percentage in the high band.
    pub const HIGH_THRESHOLD: u8 = 70;

    /// Returns the band for a whole percentage.
    #[must_use]
    pub const fn for_percent(percent: u8) -> Self {
        if percent < Self::MID_THRESHOLD {
            Self::Low
        } else if percent < Self::HIGH_THRESHOLD {
            Self::Mid
        } else {
            Self::High
        }
    }

    /// Returns the canonical band name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }
}

/// Aggregate counts over a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of incomplete tasks.
    pub pending: usize,
    /// Number of high-priority tasks.
    pub high_priority: usize,
}

impl TaskStats {
    /// Computes statistics for `tasks`.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            if task.completed() {
                stats.completed += 1;
            }
            if task.priority() == Priority::High {
                stats.high_priority += 1;
            }
        }
        stats.pending = stats.total - stats.completed;
        stats
    }

    /// Returns the completed share as a whole percentage, rounding halves
    /// up. An empty set reports zero.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let total = self.total as u128;
        let completed = self.completed as u128;
        let doubled_total = total * 2;
        let rounded = (completed * 200 + total)
            .checked_div(doubled_total)
            .unwrap_or_default();
        u8::try_from(rounded).unwrap_or(100)
    }

    /// Returns the progress band for the current completion percentage.
    #[must_use]
    pub fn progress_band(&self) -> ProgressBand {
        ProgressBand::for_percent(self.progress_percent())
    }
}
