//! Validated task content shared by creation and editing.

use super::{Category, Priority, TaskDomainError, TaskTitle};
use chrono::NaiveDate;

/// The user-editable fields of a task, already validated and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub(super) title: TaskTitle,
    pub(super) description: String,
    pub(super) priority: Priority,
    pub(super) category: Category,
    pub(super) due_date: Option<NaiveDate>,
    pub(super) important: bool,
}

impl TaskDraft {
    /// Creates a draft with the given title and default values elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskDomainError> {
        Ok(Self {
            title: TaskTitle::new(title)?,
            description: String::new(),
            priority: Priority::default(),
            category: Category::default(),
            due_date: None,
            important: false,
        })
    }

    /// Sets the description, trimming surrounding whitespace.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_owned();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the informational importance flag.
    #[must_use]
    pub const fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the importance flag.
    #[must_use]
    pub const fn important(&self) -> bool {
        self.important
    }
}
