//! Platform abstraction layer
//!
//! Browser bindings for the JS renderer. Native builds drive the simulation
//! directly from `main.rs`.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WasmSession, load_settings, save_settings};
