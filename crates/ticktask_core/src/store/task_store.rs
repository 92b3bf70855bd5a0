//! Task store: authoritative list plus write-through persistence.
//!
//! # Responsibility
//! - Mediate all task reads and writes for the presentation layer.
//! - Persist a full snapshot of the list on every successful mutation.
//! - Notify subscribers after each published state change.
//!
//! # Invariants
//! - Task ids are pairwise distinct at all times.
//! - Tasks keep insertion order; no operation reorders the list.
//! - Write-through, fail-closed: the slot write completes before the new
//!   in-memory state is published. On any persistence or encoding error the
//!   in-memory list is left exactly as it was and the error is returned.
//! - Mutations on a missing id are no-ops reported as `Ok(false)`, never
//!   errors.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::storage::slot_storage::{SlotStorage, StorageError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the serialized task list.
///
/// Inherited from the shipped app's storage schema; changing it orphans
/// existing on-device data.
pub const TASKS_SLOT_KEY: &str = "TASKS_STORAGE";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by every store operation.
///
/// Callers can distinguish a rejected input (`Validation`) from a failed
/// persistence step (`Storage`, `Snapshot`); none of these leave the store
/// in a partially applied state.
#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    Storage(StorageError),
    /// Snapshot encode failure on write, or decode failure on load.
    Snapshot(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "task snapshot codec failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Snapshot(value)
    }
}

type Subscriber = Box<dyn Fn(&[Task])>;

/// Single authoritative holder of the task list.
///
/// Constructed explicitly with an injected storage adapter; there is no
/// process-wide instance in core. The expected call pattern is the app's
/// single UI-bound thread issuing one operation at a time.
pub struct TaskStore<S: SlotStorage> {
    storage: S,
    slot_key: &'static str,
    tasks: Vec<Task>,
    subscribers: Vec<Subscriber>,
}

impl<S: SlotStorage> TaskStore<S> {
    /// Creates an empty store over the given storage adapter.
    ///
    /// The list stays empty until `load_tasks` seeds it or a mutation runs.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            slot_key: TASKS_SLOT_KEY,
            tasks: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Current published task list, insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Registers a callback invoked after every published state change.
    pub fn subscribe(&mut self, callback: impl Fn(&[Task]) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Seeds the in-memory list from the persistent slot.
    ///
    /// An absent or empty slot leaves the current list untouched. A failed
    /// read or an undecodable snapshot also leaves the current list
    /// untouched and returns the error; the store never publishes a partial
    /// load.
    ///
    /// Returns the number of tasks now in memory.
    pub fn load_tasks(&mut self) -> StoreResult<usize> {
        let stored = match self.storage.read(self.slot_key) {
            Ok(stored) => stored,
            Err(err) => {
                error!(
                    "event=tasks_load module=store status=error error_code=slot_read_failed error={err}"
                );
                return Err(err.into());
            }
        };

        let Some(snapshot) = stored.filter(|value| !value.trim().is_empty()) else {
            info!(
                "event=tasks_load module=store status=ok source=empty_slot total={}",
                self.tasks.len()
            );
            return Ok(self.tasks.len());
        };

        let loaded: Vec<Task> = match serde_json::from_str(&snapshot) {
            Ok(loaded) => loaded,
            Err(err) => {
                // Corrupt slot data: keep serving the previous list rather
                // than crashing the app at startup.
                error!(
                    "event=tasks_load module=store status=error error_code=snapshot_decode_failed error={err}"
                );
                return Err(err.into());
            }
        };

        self.tasks = loaded;
        info!(
            "event=tasks_load module=store status=ok source=slot total={}",
            self.tasks.len()
        );
        self.notify();
        Ok(self.tasks.len())
    }

    /// Creates a task and appends it to the end of the list.
    ///
    /// # Contract
    /// - Rejects empty/whitespace-only titles before any I/O.
    /// - New task starts with `completed = false`.
    /// - Returns the generated stable id.
    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        about: Option<String>,
    ) -> StoreResult<TaskId> {
        let task = Task::new(title, about);
        task.validate()?;

        let mut candidate = self.tasks.clone();
        candidate.push(task.clone());
        self.persist("task_add", &candidate)?;

        self.tasks = candidate;
        info!(
            "event=task_add module=store status=ok task_id={} total={}",
            task.id,
            self.tasks.len()
        );
        self.notify();
        Ok(task.id)
    }

    /// Replaces `title` and `about` of the matching task.
    ///
    /// `completed` and `id` are never touched by this path. Returns
    /// `Ok(false)` without persisting when the id is not present.
    pub fn update_task(
        &mut self,
        id: &str,
        title: impl Into<String>,
        about: Option<String>,
    ) -> StoreResult<bool> {
        let Some(position) = self.position_of(id) else {
            warn!("event=task_update module=store status=noop reason=not_found task_id={id}");
            return Ok(false);
        };

        let mut candidate = self.tasks.clone();
        candidate[position].title = title.into();
        candidate[position].about = about;
        candidate[position].validate()?;

        self.persist("task_update", &candidate)?;

        self.tasks = candidate;
        info!("event=task_update module=store status=ok task_id={id}");
        self.notify();
        Ok(true)
    }

    /// Flips `completed` on the matching task.
    ///
    /// Returns `Ok(false)` without persisting when the id is not present.
    pub fn toggle_task(&mut self, id: &str) -> StoreResult<bool> {
        let Some(position) = self.position_of(id) else {
            warn!("event=task_toggle module=store status=noop reason=not_found task_id={id}");
            return Ok(false);
        };

        let mut candidate = self.tasks.clone();
        candidate[position].completed = !candidate[position].completed;
        let completed = candidate[position].completed;

        self.persist("task_toggle", &candidate)?;

        self.tasks = candidate;
        info!("event=task_toggle module=store status=ok task_id={id} completed={completed}");
        self.notify();
        Ok(true)
    }

    /// Removes the matching task permanently.
    ///
    /// Returns `Ok(false)` without persisting when the id is not present.
    pub fn delete_task(&mut self, id: &str) -> StoreResult<bool> {
        if self.position_of(id).is_none() {
            warn!("event=task_delete module=store status=noop reason=not_found task_id={id}");
            return Ok(false);
        }

        let mut candidate = self.tasks.clone();
        candidate.retain(|task| task.id != id);

        self.persist("task_delete", &candidate)?;

        self.tasks = candidate;
        info!(
            "event=task_delete module=store status=ok task_id={id} total={}",
            self.tasks.len()
        );
        self.notify();
        Ok(true)
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Writes the candidate list to the slot before it becomes visible.
    ///
    /// Fail-closed: callers must not publish the candidate unless this
    /// returns `Ok`.
    fn persist(&self, event: &str, candidate: &[Task]) -> StoreResult<()> {
        let snapshot = serde_json::to_string(candidate).map_err(|err| {
            error!(
                "event={event} module=store status=error error_code=snapshot_encode_failed error={err}"
            );
            StoreError::from(err)
        })?;

        self.storage.write(self.slot_key, &snapshot).map_err(|err| {
            error!(
                "event={event} module=store status=error error_code=slot_write_failed error={err}"
            );
            StoreError::from(err)
        })
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.tasks);
        }
    }
}
