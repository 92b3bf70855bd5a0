//! Core use-case layer: the task store.
//!
//! # Responsibility
//! - Hold the authoritative in-memory task list.
//! - Keep the persistent slot mirror in sync on every mutation.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_store;
