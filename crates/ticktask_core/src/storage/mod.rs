//! Persistence adapters for the single task-list slot.
//!
//! # Responsibility
//! - Define the whole-value get/set contract the store persists through.
//! - Isolate SQLite details from store/business orchestration.
//!
//! # Invariants
//! - Adapters read and write complete serialized values, never deltas.
//! - A missing key reads as `None`, not as an error.

pub mod slot_storage;
