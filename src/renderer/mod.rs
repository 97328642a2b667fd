//! Render-facing output
//!
//! The engine never draws. It hands the renderer instance buffers built from
//! the current scene state.

pub mod instances;

pub use instances::{CameraUniform, ConfettiInstance, FrameSnapshot, OrbitLimits, SmokeInstance};
