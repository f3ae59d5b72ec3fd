//! Domain model for the task list.
//!
//! # Responsibility
//! - Define canonical data structures used by the store and views.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion removes the task; there are no tombstones.

pub mod task;
