//! Pure filter projections over the task list.
//!
//! # Responsibility
//! - Compute `all | completed | pending` views for the presentation layer.
//!
//! # Invariants
//! - Filtering never mutates or reorders the underlying list.
//! - `completed` and `pending` partition `all` with no overlap.

use crate::model::task::Task;

/// View selector the screen renders the task list through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    /// Every task, insertion order.
    #[default]
    All,
    /// Only tasks with `completed == true`.
    Completed,
    /// Only tasks with `completed == false`.
    Pending,
}

impl TaskFilter {
    /// Parses the filter names used by the UI layer.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    /// Returns whether a task belongs to this view.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
        }
    }
}

/// Projects the filtered view of `tasks`, preserving insertion order.
///
/// Stateless and cache-free; task lists are small by design.
pub fn filter_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}
