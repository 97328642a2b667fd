//! Tick-driven scene engine
//!
//! All animation and effect logic lives here. This module must stay pure:
//! - Time only comes from the caller's clock
//! - Seeded RNG only (entropy is resolved once, at construction)
//! - Deferred work goes through the timer registry, never a real timer
//! - No rendering or platform dependencies

pub mod camera;
pub mod easing;
pub mod effects;
pub mod particles;
pub mod rng;
pub mod state;
pub mod tick;
pub mod timers;

pub use camera::{CameraPhase, CameraSequencer, CameraState, Keyframe};
pub use easing::Easing;
pub use effects::{CandleState, CascadeState, EffectScheduler, TimerState, candle_positions};
pub use particles::{ConfettiParticle, ParticleSimulator, SmokeBurst, SmokeParticle};
pub use rng::{RngState, seeded_random};
pub use state::{ScenePhase, SceneEvent, SceneState, Viewpoint};
pub use tick::SceneController;
pub use timers::{TimerHandle, TimerRegistry};
