//! Persistence layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the key/value contract the task store writes through.
//! - Isolate SQLite details from store orchestration.
//!
//! # Invariants
//! - Repository APIs never interpret stored values.

pub mod kv_repo;
