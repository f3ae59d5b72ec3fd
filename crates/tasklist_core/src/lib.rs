//! Core task list logic.
//! This crate is the single source of truth for task list invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::task::{Task, TaskId, TaskListState, TaskMode};
pub use repo::kv_repo::{KvRepository, MemoryKvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::task_store::{
    Clock, StoreError, StoreResult, SystemClock, TaskActions, TaskStore, TaskStoreConfig,
    DEFAULT_STORAGE_KEY,
};
pub use view::task_view::{Intent, ItemView, ListBody, ListView, TaskView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
