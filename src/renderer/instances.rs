//! Instance data for the rendering collaborator
//!
//! Plain `#[repr(C)]` structs so a GPU renderer can upload them as-is.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;

use crate::consts::*;
use crate::sim::particles::ParticleSimulator;
use crate::sim::state::{ScenePhase, SceneState, Viewpoint};
use crate::sim::TimerState;

/// Camera eye and target
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct CameraUniform {
    pub eye: [f32; 3],
    #[serde(skip)]
    pub _pad0: f32,
    pub target: [f32; 3],
    #[serde(skip)]
    pub _pad1: f32,
}

impl CameraUniform {
    pub fn from_viewpoint(view: &Viewpoint) -> Self {
        Self {
            eye: view.position.to_array(),
            _pad0: 0.0,
            target: view.look_at.to_array(),
            _pad1: 0.0,
        }
    }
}

/// One confetti quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct ConfettiInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub rotation: [f32; 3],
    pub opacity: f32,
    pub color: [f32; 4],
}

/// One smoke puff
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct SmokeInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub opacity: f32,
}

/// Free-look constraints once the intro has finished
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct OrbitLimits {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
}

/// Everything the renderer reads for one frame
#[derive(Clone, Debug, Serialize)]
pub struct FrameSnapshot {
    pub elapsed_ms: f64,
    pub phase: ScenePhase,
    pub camera: CameraUniform,
    /// Present once the camera is handed over to orbit controls
    pub orbit: Option<OrbitLimits>,
    pub candles_lit: Vec<bool>,
    pub confetti: Vec<ConfettiInstance>,
    pub smoke: Vec<SmokeInstance>,
    pub countdown: TimerState,
}

impl FrameSnapshot {
    pub fn capture(state: &SceneState, particles: &ParticleSimulator, intro_complete: bool) -> Self {
        let confetti = if state.confetti_active {
            particles
                .confetti()
                .iter()
                .map(|p| ConfettiInstance {
                    position: p.position.to_array(),
                    scale: p.scale,
                    rotation: p.rotation.to_array(),
                    opacity: colors::CONFETTI_OPACITY,
                    color: colors::confetti(p.color),
                })
                .collect()
        } else {
            Vec::new()
        };

        let smoke = particles
            .active_smoke()
            .map(|p| SmokeInstance {
                position: p.position.to_array(),
                scale: p.scale,
                opacity: p.opacity,
            })
            .collect();

        let orbit = intro_complete.then(|| OrbitLimits {
            target: state.camera.look_at,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
        });

        Self {
            elapsed_ms: state.elapsed_ms,
            phase: state.phase,
            camera: CameraUniform::from_viewpoint(&state.camera),
            orbit,
            candles_lit: state.candles.iter().map(|c| c.lit).collect(),
            confetti,
            smoke,
            countdown: state.countdown,
        }
    }

    /// Confetti as a flat float buffer
    pub fn confetti_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.confetti)
    }

    /// Smoke as a flat float buffer
    pub fn smoke_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.smoke)
    }
}

/// Colors for scene elements
pub mod colors {
    pub const CONFETTI_OPACITY: f32 = 0.8;
    pub const SMOKE: [f32; 4] = [0.533, 0.533, 0.533, 1.0];

    /// Confetti palette: coral, teal, sky, sun, pink, violet, blue, green
    pub const CONFETTI_PALETTE: [[f32; 4]; 8] = [
        [1.0, 0.420, 0.420, 1.0],
        [0.306, 0.804, 0.769, 1.0],
        [0.271, 0.718, 0.820, 1.0],
        [1.0, 0.851, 0.239, 1.0],
        [1.0, 0.412, 0.706, 1.0],
        [0.608, 0.349, 0.714, 1.0],
        [0.204, 0.596, 0.859, 1.0],
        [0.180, 0.800, 0.443, 1.0],
    ];

    #[inline]
    pub fn confetti(index: u32) -> [f32; 4] {
        CONFETTI_PALETTE[index as usize % CONFETTI_PALETTE.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particles::{CONFETTI_PALETTE_LEN, SmokeSettings};
    use crate::sim::effects::light_candles;

    fn sim() -> ParticleSimulator {
        ParticleSimulator::new(
            42,
            80,
            SmokeSettings {
                particles_per_burst: 8,
                stagger_ms: 100.0,
                lifetime_ms: 2000.0,
            },
        )
    }

    fn state() -> SceneState {
        SceneState::new(
            Viewpoint::new(Vec3::new(0.0, 8.0, 12.0), Vec3::ZERO),
            light_candles(5),
            TimerState::new(60),
        )
    }

    #[test]
    fn test_instance_layouts() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 32);
        assert_eq!(std::mem::size_of::<ConfettiInstance>(), 48);
        assert_eq!(std::mem::size_of::<SmokeInstance>(), 20);
    }

    #[test]
    fn test_palette_covers_all_indices() {
        assert_eq!(colors::CONFETTI_PALETTE.len() as u32, CONFETTI_PALETTE_LEN);
    }

    #[test]
    fn test_confetti_hidden_until_active() {
        let mut s = state();
        let particles = sim();
        assert!(FrameSnapshot::capture(&s, &particles, false).confetti.is_empty());

        s.confetti_active = true;
        let snap = FrameSnapshot::capture(&s, &particles, false);
        assert_eq!(snap.confetti.len(), 80);
        assert_eq!(snap.confetti_floats().len(), 80 * 12);
    }

    #[test]
    fn test_orbit_only_after_intro() {
        let s = state();
        let particles = sim();
        assert!(FrameSnapshot::capture(&s, &particles, false).orbit.is_none());
        let orbit = FrameSnapshot::capture(&s, &particles, true).orbit;
        assert_eq!(orbit.map(|o| o.max_distance), Some(ORBIT_MAX_DISTANCE));
    }

    #[test]
    fn test_snapshot_reports_candles_and_smoke() {
        let mut s = state();
        s.candles[2].lit = false;
        let mut particles = sim();
        particles.spawn_smoke(2, s.candles[2].wick(), 0.0);
        particles.update_smoke(500.0);

        let snap = FrameSnapshot::capture(&s, &particles, true);
        assert_eq!(snap.candles_lit, vec![true, true, false, true, true]);
        assert!(!snap.smoke.is_empty());
        assert!(snap.smoke.iter().all(|p| p.opacity > 0.0));
        assert_eq!(snap.smoke_floats().len(), snap.smoke.len() * 5);
    }
}
