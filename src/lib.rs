//! Birthday Scene - animation and effects engine for a 3D birthday celebration
//!
//! Core modules:
//! - `sim`: Tick-driven engine (camera fly-through, candle cascade, countdown, particles)
//! - `config`: Scene configuration with clamping and JSON loading
//! - `renderer`: Read-only instance data handed to the rendering collaborator
//! - `platform`: Browser bindings (wasm32 only)

pub mod config;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{QualityPreset, SceneConfig};
pub use renderer::FrameSnapshot;
pub use sim::SceneController;

use glam::Vec3;

/// Scene configuration constants
pub mod consts {
    /// Countdown tick period (ms)
    pub const COUNTDOWN_TICK_MS: f64 = 1000.0;

    /// Confetti spawn volume and motion
    pub const CONFETTI_FALL_STEP: f32 = 0.02;
    pub const CONFETTI_WOBBLE_AMPLITUDE: f32 = 0.01;
    pub const CONFETTI_SPIN_X: f32 = 0.02;
    pub const CONFETTI_SPIN_Z: f32 = 0.01;
    /// Below this height a confetti piece is recycled
    pub const CONFETTI_FLOOR: f32 = -2.0;
    /// Recycled confetti re-enters between CEILING and CEILING + CONFETTI_RESET_SPREAD
    pub const CONFETTI_CEILING: f32 = 10.0;
    pub const CONFETTI_RESET_SPREAD: f32 = 5.0;
    pub const CONFETTI_RESET_WIDTH: f32 = 15.0;

    /// Smoke motion
    pub const SMOKE_INITIAL_OPACITY: f32 = 0.6;
    pub const SMOKE_DRIFT_FREQUENCY: f32 = 3.0;
    pub const SMOKE_DRIFT_AMPLITUDE: f32 = 0.1;
    pub const SMOKE_BASE_SCALE: f32 = 0.5;
    pub const SMOKE_GROWTH: f32 = 0.5;
    /// Height of the wick above a candle's base
    pub const WICK_HEIGHT: f32 = 0.25;

    /// Candle ring on the top tier
    pub const CANDLE_RING_RADIUS: f32 = 0.3;
    pub const CANDLE_HEIGHT: f32 = 0.45;
    pub const MAX_CANDLES: u32 = 99;

    /// Free-look limits once the intro is over
    pub const ORBIT_MIN_DISTANCE: f32 = 3.0;
    pub const ORBIT_MAX_DISTANCE: f32 = 12.0;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from + (to - from) * t
}
