//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list operations to Dart via FRB.
//! - Keep one hydrated store per process, backed by a SQLite file.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every mutating call writes through before returning `ok = true`.
//! - The per-row edit buffer lives on the Dart side; only saved text crosses.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    SqliteKvRepository, TaskStore,
};

const TASK_DB_FILE_NAME: &str = "tasklist.sqlite3";
const TASK_DB_PATH_ENV: &str = "TASKLIST_DB_PATH";

static TASK_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<TaskStore<SqliteKvRepository>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the SQLite file the task list is stored in.
///
/// # FFI contract
/// - Must be called before the first task call to take effect.
/// - Calling again with the same path is a no-op.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_task_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = TASK_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "task db already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One task row as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    /// Whether this row is the current edit target.
    pub editing: bool,
}

/// Snapshot of the whole task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListSnapshot {
    /// Tasks in insertion order.
    pub items: Vec<TaskItem>,
    pub editing_id: Option<i64>,
    /// Empty on success; error description otherwise.
    pub message: String,
}

/// Result envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the call completed and was persisted.
    pub ok: bool,
    /// Created task ID for `task_add`; `None` for other calls and blank input.
    pub task_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<i64>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Re-reads the task list from storage and returns it.
///
/// Unreadable stored data yields an empty list rather than an error.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_load() -> TaskListSnapshot {
    let mut session = lock_session();
    match open_store() {
        Ok(store) => {
            let snapshot = snapshot_of(&store);
            *session = Some(store);
            snapshot
        }
        Err(err) => failed_snapshot(format!("tasks_load failed: {err}")),
    }
}

/// Returns the current task list without touching storage.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_snapshot() -> TaskListSnapshot {
    match with_store(|store| Ok(snapshot_of(store))) {
        Ok(snapshot) => snapshot,
        Err(err) => failed_snapshot(format!("tasks_snapshot failed: {err}")),
    }
}

/// Adds a task from raw input text.
///
/// Blank input succeeds with `task_id = None` and writes nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String) -> TaskActionResponse {
    match with_store(|store| store.add(&text).map_err(|err| err.to_string())) {
        Ok(Some(id)) => TaskActionResponse::success("Task added.", Some(id)),
        Ok(None) => TaskActionResponse::success("Nothing to add.", None),
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Deletes a task; unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> TaskActionResponse {
    match with_store(|store| store.delete(id).map_err(|err| err.to_string())) {
        Ok(()) => TaskActionResponse::success("Task deleted.", None),
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Flips completion of a task; unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> TaskActionResponse {
    match with_store(|store| store.toggle_completion(id).map_err(|err| err.to_string())) {
        Ok(()) => TaskActionResponse::success("Task toggled.", None),
        Err(err) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

/// Marks a task as the edit target. Nothing is persisted.
#[flutter_rust_bridge::frb(sync)]
pub fn task_enter_edit(id: i64) -> TaskActionResponse {
    match with_store(|store| {
        store.enter_edit(id);
        Ok(())
    }) {
        Ok(()) => TaskActionResponse::success("Editing.", None),
        Err(err) => TaskActionResponse::failure(format!("task_enter_edit failed: {err}")),
    }
}

/// Saves edited text verbatim and leaves edit mode.
#[flutter_rust_bridge::frb(sync)]
pub fn task_exit_edit(id: i64, text: String) -> TaskActionResponse {
    match with_store(|store| store.exit_edit(id, text).map_err(|err| err.to_string())) {
        Ok(()) => TaskActionResponse::success("Task saved.", None),
        Err(err) => TaskActionResponse::failure(format!("task_exit_edit failed: {err}")),
    }
}

fn resolve_task_db_path() -> PathBuf {
    TASK_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(TASK_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(TASK_DB_FILE_NAME)
        })
        .clone()
}

fn lock_session() -> MutexGuard<'static, Option<TaskStore<SqliteKvRepository>>> {
    SESSION.lock().unwrap_or_else(|poisoned| {
        warn!("event=ffi_session module=ffi status=recovered reason=poisoned_lock");
        poisoned.into_inner()
    })
}

fn open_store() -> Result<TaskStore<SqliteKvRepository>, String> {
    let repo = SqliteKvRepository::open(resolve_task_db_path())
        .map_err(|err| format!("task DB open failed: {err}"))?;
    Ok(TaskStore::open(repo))
}

fn with_store<T>(
    f: impl FnOnce(&mut TaskStore<SqliteKvRepository>) -> Result<T, String>,
) -> Result<T, String> {
    let mut session = lock_session();
    if session.is_none() {
        *session = Some(open_store()?);
    }
    match session.as_mut() {
        Some(store) => f(store),
        None => Err("task session unavailable".to_string()),
    }
}

fn snapshot_of(store: &TaskStore<SqliteKvRepository>) -> TaskListSnapshot {
    TaskListSnapshot {
        items: store
            .tasks()
            .iter()
            .map(|task| TaskItem {
                id: task.id,
                text: task.text.clone(),
                completed: task.completed,
                editing: store.is_editing(task.id),
            })
            .collect(),
        editing_id: store.editing_id(),
        message: String::new(),
    }
}

fn failed_snapshot(message: String) -> TaskListSnapshot {
    TaskListSnapshot {
        items: Vec::new(),
        editing_id: None,
        message,
    }
}
