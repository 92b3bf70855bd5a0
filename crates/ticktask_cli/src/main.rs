//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ticktask_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Keep a tiny CLI probe to validate core crate wiring independently
    // from the Flutter/FFI runtime setup.
    println!("ticktask_core ping={}", ticktask_core::ping());
    println!("ticktask_core version={}", ticktask_core::core_version());
}
