//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and the session-level list state.
//! - Keep the wire shape `{id, text, completed}` stable for storage.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reassigned.
//! - `text` is trimmed and non-empty at creation; edits store text verbatim.
//! - `completed` starts as `false`.

use serde::{Deserialize, Serialize};

/// Stable identifier for a task.
///
/// Derived from wall-clock epoch milliseconds at creation time.
pub type TaskId = i64;

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Creates an open task with the given id and text.
    ///
    /// Callers are responsible for trimming and rejecting empty text.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Display mode for one task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMode {
    Viewing,
    Editing,
}

/// Snapshot of the whole list session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    /// Insertion-ordered tasks.
    pub tasks: Vec<Task>,
    /// Weak reference to the edit target, if any.
    pub editing_id: Option<TaskId>,
    /// Pending text typed into the add input.
    pub input: String,
}

impl TaskListState {
    /// Returns the display mode for `id`.
    pub fn mode_of(&self, id: TaskId) -> TaskMode {
        if self.editing_id == Some(id) {
            TaskMode::Editing
        } else {
            TaskMode::Viewing
        }
    }
}

/// Encodes a task sequence into its persisted JSON form.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Decodes a persisted JSON task sequence.
///
/// A JSON `null` decodes to an empty sequence.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, serde_json::Error> {
    let tasks: Option<Vec<Task>> = serde_json::from_str(raw)?;
    Ok(tasks.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks, Task, TaskListState, TaskMode};

    #[test]
    fn toggle_flips_completed() {
        let mut task = Task::new(1, "write tests");
        task.toggle();
        assert!(task.completed);
        task.toggle();
        assert!(!task.completed);
    }

    #[test]
    fn encode_uses_wire_field_names() {
        let json = encode_tasks(&[Task::new(7, "a")]).expect("encode should succeed");
        assert_eq!(json, r#"[{"id":7,"text":"a","completed":false}]"#);
    }

    #[test]
    fn decode_null_yields_empty_sequence() {
        assert!(decode_tasks("null").expect("null should decode").is_empty());
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        assert!(decode_tasks(r#"{"id":1}"#).is_err());
    }

    #[test]
    fn mode_of_only_marks_edit_target() {
        let state = TaskListState {
            tasks: vec![Task::new(1, "a"), Task::new(2, "b")],
            editing_id: Some(2),
            input: String::new(),
        };
        assert_eq!(state.mode_of(1), TaskMode::Viewing);
        assert_eq!(state.mode_of(2), TaskMode::Editing);
    }
}
