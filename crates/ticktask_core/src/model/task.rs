//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted entity of the application.
//! - Enforce the title validation rule shared by all write paths.
//!
//! # Invariants
//! - `id` is an opaque string, stable and never reused for another task.
//! - `completed` starts as `false` at creation.
//! - Serialized field names (`id`, `title`, `about`, `completed`) are the
//!   stored snapshot schema and must stay stable across releases.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable opaque identifier for a task.
///
/// New ids are UUID v4 strings; ids from older snapshots (the shipped app
/// used millisecond timestamps) are carried through verbatim.
pub type TaskId = String;

/// Validation error for task write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A single to-do item.
///
/// `about` is optional free text; snapshots written before the field existed
/// deserialize with `about = None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable opaque ID used for lookup, toggling and deletion.
    pub id: TaskId,
    /// Short display text shown in the list.
    pub title: String,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Completion flag; flipped by toggle, never by update.
    pub completed: bool,
}

impl Task {
    /// Creates a new task with a generated stable ID and `completed = false`.
    pub fn new(title: impl Into<String>, about: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            about,
            completed: false,
        }
    }

    /// Checks the title rule shared by create and update paths.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyTitle` when the title is empty or
    ///   whitespace-only.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}
