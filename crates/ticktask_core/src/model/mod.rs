//! Domain model for the to-do list core.
//!
//! # Responsibility
//! - Define the canonical task record and its validation rules.
//! - Provide the pure filter projections the presentation layer renders.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` assigned at creation.
//! - Title validation lives here and is enforced once, in core.

pub mod filter;
pub mod task;
