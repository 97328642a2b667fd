//! Platform abstraction layer
//!
//! The browser owns the clock, input and rendering; this layer only forwards
//! them to the engine. Native builds drive the engine from `main.rs` instead.

#[cfg(target_arch = "wasm32")]
pub mod web;
