//! FFI use-case API for the task screen.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for UI integration: envelopes, no throws.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Mutators report `changed = false` (not an error) for unknown ids.
//! - An undecodable stored snapshot degrades to the empty list; it never
//!   locks the store out, and the next successful mutation replaces it.

use std::path::PathBuf;
use std::sync::OnceLock;
use ticktask_core::db::open_db;
use ticktask_core::{
    core_version as core_version_inner, filter_tasks, init_logging as init_logging_inner,
    ping as ping_inner, SqliteSlotStorage, StoreError, StoreResult, Task, TaskFilter, TaskStore,
};

const TASKS_DB_FILE_NAME: &str = "ticktask_tasks.sqlite3";
static TASKS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task record shape rendered by the task screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Stable task ID in string form.
    pub id: String,
    /// Short display text.
    pub title: String,
    /// Optional longer description.
    pub about: Option<String>,
    /// Completion flag.
    pub completed: bool,
}

/// List response envelope for the task screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// Tasks matching the requested filter, insertion order.
    pub items: Vec<TaskItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the operation completed without error.
    pub ok: bool,
    /// Created task ID (`add_task` only).
    pub task_id: Option<String>,
    /// Whether a task was actually created/modified/removed.
    pub changed: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn created(message: impl Into<String>, task_id: String) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id),
            changed: true,
            message: message.into(),
        }
    }

    fn changed(message: impl Into<String>, changed: bool) -> Self {
        Self {
            ok: true,
            task_id: None,
            changed,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            changed: false,
            message: message.into(),
        }
    }
}

/// Binds the task store to the host app's storage directory.
///
/// Input semantics:
/// - `db_dir`: directory the host owns (e.g. the app documents dir); the
///   SQLite file is created inside it.
///
/// # FFI contract
/// - Sync call; must run before any task operation.
/// - Safe to call repeatedly with the same `db_dir` (idempotent).
/// - Reconfiguration attempts with a different directory return
///   `ok = false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn init_task_store(db_dir: String) -> TaskActionResponse {
    let trimmed = db_dir.trim();
    if trimmed.is_empty() {
        return TaskActionResponse::failure("init_task_store failed: db_dir cannot be empty");
    }

    let dir = PathBuf::from(trimmed);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        return TaskActionResponse::failure(format!(
            "init_task_store failed: cannot create `{}`: {err}",
            dir.display()
        ));
    }

    let db_path = dir.join(TASKS_DB_FILE_NAME);
    let active = TASKS_DB_PATH.get_or_init(|| db_path.clone());
    if *active != db_path {
        return TaskActionResponse::failure(format!(
            "task store already initialized at `{}`; refusing to switch to `{}`",
            active.display(),
            db_path.display()
        ));
    }

    // Surface storage problems at startup instead of on the first tap.
    match with_task_store(|store| Ok(store.tasks().len())) {
        Ok(count) => {
            log::info!("event=ffi_store_init module=ffi status=ok total={count}");
            TaskActionResponse::changed(format!("Task store ready; {count} task(s) loaded."), false)
        }
        Err(err) => TaskActionResponse::failure(format!("init_task_store failed: {err}")),
    }
}

/// Lists tasks through a filter (`all|completed|pending`).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown filter names fall back to `all`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn list_tasks(filter: String) -> TaskListResponse {
    let filter = TaskFilter::parse(&filter).unwrap_or_default();
    match with_task_store(|store| {
        Ok(filter_tasks(store.tasks(), filter)
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>())
    }) {
        Ok(items) => {
            let message = format!("{} task(s).", items.len());
            TaskListResponse { items, message }
        }
        Err(err) => TaskListResponse {
            items: Vec::new(),
            message: format!("list_tasks failed: {err}"),
        },
    }
}

/// Creates a task.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Empty/whitespace titles are rejected with `ok = false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn add_task(title: String, about: Option<String>) -> TaskActionResponse {
    match with_task_store(|store| store.add_task(title.trim(), normalize_about(about))) {
        Ok(task_id) => TaskActionResponse::created("Task created.", task_id),
        Err(err) => TaskActionResponse::failure(format!("add_task failed: {err}")),
    }
}

/// Replaces title and description of an existing task.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown ids are reported as `changed = false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn update_task(id: String, title: String, about: Option<String>) -> TaskActionResponse {
    match with_task_store(|store| {
        store.update_task(id.trim(), title.trim(), normalize_about(about))
    }) {
        Ok(true) => TaskActionResponse::changed("Task updated.", true),
        Ok(false) => TaskActionResponse::changed("Task not found; nothing changed.", false),
        Err(err) => TaskActionResponse::failure(format!("update_task failed: {err}")),
    }
}

/// Flips the completion flag of an existing task.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown ids are reported as `changed = false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_task(id: String) -> TaskActionResponse {
    match with_task_store(|store| store.toggle_task(id.trim())) {
        Ok(true) => TaskActionResponse::changed("Task toggled.", true),
        Ok(false) => TaskActionResponse::changed("Task not found; nothing changed.", false),
        Err(err) => TaskActionResponse::failure(format!("toggle_task failed: {err}")),
    }
}

/// Deletes an existing task permanently.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown ids are reported as `changed = false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_task(id: String) -> TaskActionResponse {
    match with_task_store(|store| store.delete_task(id.trim())) {
        Ok(true) => TaskActionResponse::changed("Task deleted.", true),
        Ok(false) => TaskActionResponse::changed("Task not found; nothing changed.", false),
        Err(err) => TaskActionResponse::failure(format!("delete_task failed: {err}")),
    }
}

fn resolve_tasks_db_path() -> Result<PathBuf, String> {
    TASKS_DB_PATH
        .get()
        .cloned()
        .ok_or_else(|| "task store not initialized; call init_task_store first".to_string())
}

fn with_task_store<T>(
    f: impl FnOnce(&mut TaskStore<SqliteSlotStorage<'_>>) -> StoreResult<T>,
) -> Result<T, String> {
    let db_path = resolve_tasks_db_path()?;
    let conn = open_db(&db_path).map_err(|err| {
        log::warn!("event=ffi_store_open module=ffi status=error error={err}");
        format!("tasks DB open failed: {err}")
    })?;
    let mut store = TaskStore::new(SqliteSlotStorage::new(&conn));
    if let Err(err) = store.load_tasks() {
        match err {
            // A snapshot that no longer decodes must not brick the app:
            // serve the safe empty list; the next successful mutation
            // rewrites the slot with a valid snapshot.
            StoreError::Snapshot(_) => {
                log::warn!("event=ffi_tasks_load module=ffi status=degraded error={err}");
            }
            other => return Err(format!("tasks load failed: {other}")),
        }
    }
    f(&mut store).map_err(|err| err.to_string())
}

fn normalize_about(about: Option<String>) -> Option<String> {
    about
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        about: task.about.clone(),
        completed: task.completed,
    }
}
