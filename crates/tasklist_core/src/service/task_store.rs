//! Task list store.
//!
//! # Responsibility
//! - Own the canonical task sequence and the session edit/input state.
//! - Write the full sequence through to a `KvRepository` after every mutation.
//!
//! # Invariants
//! - Task ids are unique within the list and increase on add until `i64::MAX`
//!   is taken; after that the highest free id is reused.
//! - At most one task is the edit target.
//! - After a mutating call returns `Ok`, the persisted value equals the
//!   in-memory sequence.
//! - Operations on unknown ids are silent no-ops; they never fail.

use crate::model::task::{decode_tasks, encode_tasks, Task, TaskId, TaskListState};
use crate::repo::kv_repo::{KvRepository, RepoError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Storage key used when no other namespace is configured.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by mutating store operations.
///
/// Only write-path failures exist; read-path problems degrade to an empty
/// list during `load`.
#[derive(Debug)]
pub enum StoreError {
    /// The repository rejected the write.
    Persistence(RepoError),
    /// The task sequence could not be serialized.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "failed to persist tasks: {err}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStoreConfig {
    /// Namespace key the whole list is stored under.
    pub storage_key: String,
}

impl Default for TaskStoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Millisecond clock used to derive task ids.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock in Unix epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

impl<F: Fn() -> i64> Clock for F {
    fn now_ms(&self) -> i64 {
        self()
    }
}

/// Store interface handed to view code.
///
/// Views read state and issue intents only through this trait, so they never
/// depend on the persistence backend.
pub trait TaskActions {
    fn state(&self) -> &TaskListState;
    fn revision(&self) -> u64;
    fn set_input(&mut self, text: String);
    fn add(&mut self, text: &str) -> StoreResult<Option<TaskId>>;
    fn delete(&mut self, id: TaskId) -> StoreResult<()>;
    fn toggle_completion(&mut self, id: TaskId) -> StoreResult<()>;
    fn enter_edit(&mut self, id: TaskId);
    fn exit_edit(&mut self, id: TaskId, new_text: String) -> StoreResult<()>;
}

/// Write-through task list store.
pub struct TaskStore<R: KvRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    config: TaskStoreConfig,
    state: TaskListState,
    last_id: Option<TaskId>,
    revision: u64,
}

impl<R: KvRepository> TaskStore<R, SystemClock> {
    /// Creates an empty store with default configuration.
    ///
    /// Call [`TaskStore::load`] to hydrate from persistence.
    pub fn new(repo: R) -> Self {
        Self::with_parts(repo, TaskStoreConfig::default(), SystemClock)
    }

    /// Creates a store with default configuration and hydrates it.
    pub fn open(repo: R) -> Self {
        let mut store = Self::new(repo);
        store.load();
        store
    }
}

impl<R: KvRepository, C: Clock> TaskStore<R, C> {
    /// Creates an empty store from explicit parts.
    pub fn with_parts(repo: R, config: TaskStoreConfig, clock: C) -> Self {
        Self {
            repo,
            clock,
            config,
            state: TaskListState::default(),
            last_id: None,
            revision: 0,
        }
    }

    /// Replaces the in-memory sequence with the persisted one.
    ///
    /// Absent, unreadable or unparseable data yields an empty list. Never
    /// writes and never fails.
    pub fn load(&mut self) {
        let key = self.config.storage_key.as_str();
        let tasks = match self.repo.read(key) {
            Ok(Some(raw)) => match decode_tasks(&raw) {
                Ok(tasks) => dedupe_ids(tasks),
                Err(err) => {
                    warn!(
                        "event=tasks_load module=store status=fallback reason=decode_failed error={}",
                        err
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(
                    "event=tasks_load module=store status=fallback reason=read_failed error={}",
                    err
                );
                Vec::new()
            }
        };

        self.last_id = tasks.iter().map(|task| task.id).max();
        self.state.tasks = tasks;
        self.touch();
        info!(
            "event=tasks_load module=store status=ok count={}",
            self.state.tasks.len()
        );
    }

    /// Replaces the pending input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input = text.into();
        self.touch();
    }

    /// Returns the pending input buffer.
    pub fn input(&self) -> &str {
        &self.state.input
    }

    /// Adds the pending input buffer as a task.
    pub fn submit_input(&mut self) -> StoreResult<Option<TaskId>> {
        let text = self.state.input.clone();
        self.add(&text)
    }

    /// Appends a task built from trimmed `text`.
    ///
    /// Returns `Ok(None)` without writing when the trimmed text is empty.
    /// On success the pending input buffer is cleared.
    pub fn add(&mut self, text: &str) -> StoreResult<Option<TaskId>> {
        let trimmed = trim_input(text);
        if trimmed.is_empty() {
            debug!("event=task_add module=store status=skip reason=empty_text");
            return Ok(None);
        }

        let id = self.next_id();
        self.state.tasks.push(Task::new(id, trimmed));
        self.touch();
        self.persist("task_add")?;

        self.state.input.clear();
        info!("event=task_add module=store status=ok task_id={id}");
        Ok(Some(id))
    }

    /// Removes the task with `id`; persists even when nothing matched.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<()> {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|task| task.id != id);
        let removed = before != self.state.tasks.len();
        self.touch();
        self.persist("task_delete")?;

        info!("event=task_delete module=store status=ok task_id={id} removed={removed}");
        Ok(())
    }

    /// Flips completion on the task with `id`; persists even when nothing
    /// matched.
    pub fn toggle_completion(&mut self, id: TaskId) -> StoreResult<()> {
        let matched = match self.find_mut(id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        };
        self.touch();
        self.persist("task_toggle")?;

        debug!("event=task_toggle module=store status=ok task_id={id} matched={matched}");
        Ok(())
    }

    /// Marks `id` as the edit target, replacing any previous target.
    ///
    /// The id is not checked against the list and nothing is persisted.
    pub fn enter_edit(&mut self, id: TaskId) {
        if let Some(previous) = self.state.editing_id.replace(id) {
            if previous != id {
                debug!(
                    "event=task_edit module=store status=replaced previous_id={previous} task_id={id}"
                );
            }
        }
        self.touch();
    }

    /// Saves `new_text` verbatim into the task with `id` and leaves edit mode.
    ///
    /// The text is neither trimmed nor checked for emptiness. The write
    /// happens and edit mode is cleared even when `id` matched nothing.
    pub fn exit_edit(&mut self, id: TaskId, new_text: impl Into<String>) -> StoreResult<()> {
        let new_text = new_text.into();
        let matched = match self.find_mut(id) {
            Some(task) => {
                task.text = new_text;
                true
            }
            None => false,
        };
        self.touch();
        self.persist("task_save")?;

        self.state.editing_id = None;
        info!("event=task_save module=store status=ok task_id={id} matched={matched}");
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.state.tasks.iter().find(|task| task.id == id)
    }

    pub fn editing_id(&self) -> Option<TaskId> {
        self.state.editing_id
    }

    pub fn is_editing(&self, id: TaskId) -> bool {
        self.state.editing_id == Some(id)
    }

    pub fn len(&self) -> usize {
        self.state.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.state.tasks.iter().filter(|task| task.completed).count()
    }

    /// Full session snapshot.
    pub fn state(&self) -> &TaskListState {
        &self.state
    }

    /// Change counter, bumped once per state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &TaskStoreConfig {
        &self.config
    }

    /// Borrows the persistence backend.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.state.tasks.iter_mut().find(|task| task.id == id)
    }

    fn next_id(&mut self) -> TaskId {
        let now = self.clock.now_ms();
        let candidate = match self.last_id {
            Some(last) if now <= last => last.checked_add(1),
            _ => Some(now),
        };
        match candidate {
            Some(id) => {
                self.last_id = Some(id);
                id
            }
            None => {
                let id = self.highest_free_id();
                warn!("event=task_add module=store status=fallback reason=id_overflow task_id={id}");
                id
            }
        }
    }

    // Only reachable once an id of `i64::MAX` is in use; `last_id` stays pinned.
    fn highest_free_id(&self) -> TaskId {
        let taken: HashSet<TaskId> = self.state.tasks.iter().map(|task| task.id).collect();
        let mut id = TaskId::MAX;
        while taken.contains(&id) {
            id = id.wrapping_sub(1);
        }
        id
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn persist(&self, event: &'static str) -> StoreResult<()> {
        let encoded = encode_tasks(&self.state.tasks)?;
        if let Err(err) = self.repo.write(&self.config.storage_key, &encoded) {
            warn!("event={event} module=store status=error error_code=persist_failed error={err}");
            return Err(err.into());
        }
        Ok(())
    }
}

impl<R: KvRepository, C: Clock> TaskActions for TaskStore<R, C> {
    fn state(&self) -> &TaskListState {
        TaskStore::state(self)
    }

    fn revision(&self) -> u64 {
        TaskStore::revision(self)
    }

    fn set_input(&mut self, text: String) {
        TaskStore::set_input(self, text);
    }

    fn add(&mut self, text: &str) -> StoreResult<Option<TaskId>> {
        TaskStore::add(self, text)
    }

    fn delete(&mut self, id: TaskId) -> StoreResult<()> {
        TaskStore::delete(self, id)
    }

    fn toggle_completion(&mut self, id: TaskId) -> StoreResult<()> {
        TaskStore::toggle_completion(self, id)
    }

    fn enter_edit(&mut self, id: TaskId) {
        TaskStore::enter_edit(self, id);
    }

    fn exit_edit(&mut self, id: TaskId, new_text: String) -> StoreResult<()> {
        TaskStore::exit_edit(self, id, new_text)
    }
}

/// Trims the whitespace set browsers strip from form input.
///
/// Differs from `str::trim` in two characters: U+FEFF is stripped and
/// U+0085 is kept.
fn trim_input(text: &str) -> &str {
    text.trim_matches(|c: char| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}'))
}

fn dedupe_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let total = tasks.len();
    let unique: Vec<Task> = tasks.into_iter().filter(|task| seen.insert(task.id)).collect();
    if unique.len() != total {
        warn!(
            "event=tasks_load module=store status=dedupe dropped={}",
            total - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{dedupe_ids, trim_input, Clock, SystemClock};
    use crate::model::task::Task;

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now_ms() > 0);
    }

    #[test]
    fn closures_act_as_clocks() {
        let clock = || 42_i64;
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn trim_input_strips_bom_and_keeps_next_line() {
        assert_eq!(trim_input("\u{FEFF}"), "");
        assert_eq!(trim_input(" \u{FEFF}a\u{3000}"), "a");
        assert_eq!(trim_input("\u{85}"), "\u{85}");
        assert_eq!(trim_input("\t\n\u{A0}\u{2028}"), "");
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let tasks = vec![Task::new(1, "a"), Task::new(1, "b"), Task::new(2, "c")];
        let unique = dedupe_ids(tasks);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].text, "a");
        assert_eq!(unique[1].id, 2);
    }
}
