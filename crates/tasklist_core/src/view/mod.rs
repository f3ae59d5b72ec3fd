//! View-model layer between user interaction and the task store.
//!
//! # Responsibility
//! - Route intents to the store interface.
//! - Build render models for declarative renderers (CLI, Flutter).

pub mod task_view;
