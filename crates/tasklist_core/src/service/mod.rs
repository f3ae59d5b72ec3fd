//! Core use-case services.
//!
//! # Responsibility
//! - Own session state and orchestrate persistence writes.
//! - Keep view/FFI layers decoupled from storage details.

pub mod task_store;
