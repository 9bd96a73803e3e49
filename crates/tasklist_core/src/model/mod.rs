//! Task list domain model.
//!
//! # Responsibility
//! - Define the task record and its creation input.
//! - Define the time-horizon screens a list can be opened for.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod horizon;
pub mod task;
