//! Task list view-model.
//!
//! # Responsibility
//! - Translate user intents into `TaskActions` calls.
//! - Hold the transient edit buffer for the current edit target.
//! - Produce a declarative `ListView` render model for renderers.
//!
//! # Invariants
//! - The view owns no durable state; all mutations go through the store.
//! - The edit buffer only exists for the store's current edit target.
//! - A render is rebuilt only when the store revision or the buffer changed.

use crate::model::task::{TaskId, TaskMode};
use crate::service::task_store::{StoreResult, TaskActions};
use std::fmt::{Display, Formatter};

pub const LIST_TITLE: &str = "Task List";
pub const INPUT_PLACEHOLDER: &str = "Enter a task";
pub const EMPTY_MESSAGE: &str = "No tasks yet";

/// User interaction routed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Replace the add-input text.
    SetInput(String),
    /// Add the current add-input text.
    Add,
    Delete(TaskId),
    Toggle(TaskId),
    /// Enter edit mode for a task.
    Edit(TaskId),
    /// Replace the edit buffer text for the edit target.
    EditText(TaskId, String),
    /// Save the edit buffer and leave edit mode.
    Save(TaskId),
}

/// Render model for a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub mode: TaskMode,
    /// Present only while `mode == TaskMode::Editing`.
    pub edit_text: Option<String>,
}

/// Body of the list render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    /// Placeholder shown when there are no tasks.
    Empty(&'static str),
    Items(Vec<ItemView>),
}

/// Render model for the whole widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub title: &'static str,
    pub input: String,
    pub placeholder: &'static str,
    pub body: ListBody,
}

impl ListView {
    /// Rows in display order; empty for the placeholder body.
    pub fn items(&self) -> &[ItemView] {
        match &self.body {
            ListBody::Empty(_) => &[],
            ListBody::Items(items) => items,
        }
    }
}

impl Display for ListView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.input.is_empty() {
            writeln!(f, "> <{}>", self.placeholder)?;
        } else {
            writeln!(f, "> {}", self.input)?;
        }
        match &self.body {
            ListBody::Empty(message) => writeln!(f, "  {message}"),
            ListBody::Items(items) => {
                for item in items {
                    match (&item.mode, &item.edit_text) {
                        (TaskMode::Editing, Some(buffer)) => {
                            writeln!(f, "  [~] {} {} (editing)", item.id, buffer)?
                        }
                        _ => {
                            let mark = if item.completed { 'x' } else { ' ' };
                            writeln!(f, "  [{mark}] {} {}", item.id, item.text)?
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
struct EditBuffer {
    id: TaskId,
    text: String,
}

/// View over a `TaskActions` store holding only the edit buffer and the
/// last render.
#[derive(Debug, Default)]
pub struct TaskView {
    edit: Option<EditBuffer>,
    edit_revision: u64,
    cache: Option<(u64, u64, ListView)>,
    builds: u64,
}

impl TaskView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one intent to the store.
    ///
    /// Store errors are returned unchanged. A failed save keeps the buffer.
    pub fn dispatch<S: TaskActions + ?Sized>(
        &mut self,
        store: &mut S,
        intent: Intent,
    ) -> StoreResult<()> {
        match intent {
            Intent::SetInput(text) => store.set_input(text),
            Intent::Add => {
                let text = store.state().input.clone();
                store.add(&text)?;
            }
            Intent::Delete(id) => store.delete(id)?,
            Intent::Toggle(id) => store.toggle_completion(id)?,
            Intent::Edit(id) => {
                store.enter_edit(id);
                if self.edit.as_ref().map(|buffer| buffer.id) != Some(id) {
                    let text = task_text(&*store, id).unwrap_or_default();
                    self.set_buffer(Some(EditBuffer { id, text }));
                }
            }
            Intent::EditText(id, text) => {
                if store.state().editing_id == Some(id) {
                    self.set_buffer(Some(EditBuffer { id, text }));
                }
            }
            Intent::Save(id) => {
                let text = match &self.edit {
                    Some(buffer) if buffer.id == id => buffer.text.clone(),
                    _ => task_text(&*store, id).unwrap_or_default(),
                };
                store.exit_edit(id, text)?;
            }
        }

        self.sync_buffer(&*store);
        Ok(())
    }

    /// Current edit buffer text for `id`, if it is the edit target.
    pub fn edit_text(&self, id: TaskId) -> Option<&str> {
        self.edit
            .as_ref()
            .filter(|buffer| buffer.id == id)
            .map(|buffer| buffer.text.as_str())
    }

    /// Builds (or reuses) the render model for the store's current state.
    pub fn render<S: TaskActions + ?Sized>(&mut self, store: &S) -> &ListView {
        self.sync_buffer(store);
        let revision = store.revision();
        let fresh = matches!(
            &self.cache,
            Some((cached_rev, cached_edit, _))
                if *cached_rev == revision && *cached_edit == self.edit_revision
        );
        let cached = match self.cache.take() {
            Some(cached) if fresh => cached,
            _ => {
                self.builds += 1;
                (revision, self.edit_revision, self.build(store))
            }
        };
        &self.cache.insert(cached).2
    }

    /// Number of times `render` rebuilt the list instead of reusing it.
    pub fn build_count(&self) -> u64 {
        self.builds
    }

    fn build<S: TaskActions + ?Sized>(&self, store: &S) -> ListView {
        let state = store.state();
        let body = if state.tasks.is_empty() {
            ListBody::Empty(EMPTY_MESSAGE)
        } else {
            ListBody::Items(
                state
                    .tasks
                    .iter()
                    .map(|task| {
                        let mode = state.mode_of(task.id);
                        let edit_text = match mode {
                            TaskMode::Editing => Some(
                                self.edit_text(task.id)
                                    .unwrap_or(task.text.as_str())
                                    .to_string(),
                            ),
                            TaskMode::Viewing => None,
                        };
                        ItemView {
                            id: task.id,
                            text: task.text.clone(),
                            completed: task.completed,
                            mode,
                            edit_text,
                        }
                    })
                    .collect(),
            )
        };

        ListView {
            title: LIST_TITLE,
            input: state.input.clone(),
            placeholder: INPUT_PLACEHOLDER,
            body,
        }
    }

    fn set_buffer(&mut self, buffer: Option<EditBuffer>) {
        self.edit = buffer;
        self.edit_revision = self.edit_revision.wrapping_add(1);
    }

    /// Drops a buffer whose task is no longer the edit target.
    fn sync_buffer<S: TaskActions + ?Sized>(&mut self, store: &S) {
        let target = store.state().editing_id;
        if self.edit.as_ref().is_some_and(|buffer| Some(buffer.id) != target) {
            self.set_buffer(None);
        }
    }
}

fn task_text<S: TaskActions + ?Sized>(store: &S, id: TaskId) -> Option<String> {
    store
        .state()
        .tasks
        .iter()
        .find(|task| task.id == id)
        .map(|task| task.text.clone())
}

#[cfg(test)]
mod tests {
    use super::{ListBody, ListView, EMPTY_MESSAGE, INPUT_PLACEHOLDER, LIST_TITLE};

    #[test]
    fn empty_list_renders_placeholder_text() {
        let view = ListView {
            title: LIST_TITLE,
            input: String::new(),
            placeholder: INPUT_PLACEHOLDER,
            body: ListBody::Empty(EMPTY_MESSAGE),
        };
        let rendered = view.to_string();
        assert_eq!(rendered, "Task List\n> <Enter a task>\n  No tasks yet\n");
        assert!(view.items().is_empty());
    }
}
