//! FFI crate exposing the task core to the mobile UI.

pub mod api;
