//! Camera fly-through
//!
//! The sequencer walks a fixed list of keyframes. Transition `i` moves the camera
//! from keyframe `i` to keyframe `i + 1` over the target keyframe's duration:
//!
//! ```text
//! Idle --(start delay)--> Transitioning(0) --> ... --> Transitioning(N-2) --> Complete
//! ```
//!
//! Phase boundaries are carried over exactly (the next phase starts at
//! `phase_start + duration`, not at the clock value that noticed the boundary),
//! so the outcome does not depend on how the caller slices time.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::easing::Easing;
use super::state::{SceneEvent, SceneState, Viewpoint};
use crate::{clamp01, lerp_vec3};

/// A camera viewpoint reached after `duration_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Time spent travelling into this keyframe from the previous one
    pub duration_ms: u64,
}

impl Keyframe {
    pub const fn new(position: Vec3, look_at: Vec3, duration_ms: u64) -> Self {
        Self {
            position,
            look_at,
            duration_ms,
        }
    }

    pub fn viewpoint(&self) -> Viewpoint {
        Viewpoint::new(self.position, self.look_at)
    }
}

/// Opening overview, two sweeps around the table, close-up on the cake
pub fn default_keyframes() -> Vec<Keyframe> {
    vec![
        Keyframe::new(Vec3::new(0.0, 8.0, 12.0), Vec3::ZERO, 0),
        Keyframe::new(Vec3::new(8.0, 5.0, 8.0), Vec3::new(0.0, 1.0, 0.0), 2500),
        Keyframe::new(Vec3::new(-5.0, 3.0, 6.0), Vec3::new(0.0, 1.0, 0.0), 2500),
        Keyframe::new(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.5, 0.0), 2000),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraPhase {
    /// Holding the first keyframe
    Idle,
    /// Travelling from keyframe `index` to `index + 1`
    Transitioning { index: usize },
    /// Terminal
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub phase: CameraPhase,
    pub phase_start_ms: f64,
    pub is_complete: bool,
}

impl CameraState {
    /// Index of the active transition (0 while idle, last index once complete)
    pub fn current_phase_index(&self, transitions: usize) -> usize {
        match self.phase {
            CameraPhase::Idle => 0,
            CameraPhase::Transitioning { index } => index,
            CameraPhase::Complete => transitions.saturating_sub(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraSequencer {
    keyframes: Vec<Keyframe>,
    easing: Easing,
    start_delay_ms: f64,
    state: CameraState,
}

impl CameraSequencer {
    /// Build a sequencer. An empty keyframe list falls back to the default fly-through.
    pub fn new(keyframes: Vec<Keyframe>, easing: Easing, start_delay_ms: u64) -> Self {
        let keyframes = if keyframes.is_empty() {
            log::warn!("No camera keyframes configured, using defaults");
            default_keyframes()
        } else {
            keyframes
        };
        Self {
            keyframes,
            easing,
            start_delay_ms: start_delay_ms as f64,
            state: CameraState {
                phase: CameraPhase::Idle,
                phase_start_ms: 0.0,
                is_complete: false,
            },
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    /// Number of transitions in the fly-through
    pub fn transition_count(&self) -> usize {
        self.keyframes.len().saturating_sub(1)
    }

    pub fn initial_viewpoint(&self) -> Viewpoint {
        self.keyframes[0].viewpoint()
    }

    pub fn final_viewpoint(&self) -> Viewpoint {
        self.keyframes[self.keyframes.len() - 1].viewpoint()
    }

    /// Total time from clock zero until the fly-through completes
    pub fn total_duration_ms(&self) -> f64 {
        self.start_delay_ms
            + self.keyframes[1..]
                .iter()
                .map(|k| k.duration_ms as f64)
                .sum::<f64>()
    }

    /// Move the camera to where it should be at `now_ms`.
    ///
    /// Crosses as many phase boundaries as `now_ms` covers. Returns true if the
    /// fly-through completed during this call.
    pub fn advance(&mut self, now_ms: f64, scene: &mut SceneState) -> bool {
        loop {
            match self.state.phase {
                CameraPhase::Complete => return false,
                CameraPhase::Idle => {
                    if now_ms < self.start_delay_ms {
                        scene.camera = self.initial_viewpoint();
                        return false;
                    }
                    scene.push_event(SceneEvent::IntroStarted {
                        at_ms: self.start_delay_ms,
                    });
                    log::info!("Camera intro started");
                    if self.enter_phase(0, self.start_delay_ms, scene) {
                        return true;
                    }
                }
                CameraPhase::Transitioning { index } => {
                    let from = self.keyframes[index];
                    let to = self.keyframes[index + 1];
                    let duration = to.duration_ms as f64;
                    let elapsed = now_ms - self.state.phase_start_ms;
                    let progress = if duration <= 0.0 {
                        1.0
                    } else {
                        clamp01(elapsed / duration)
                    };
                    let eased = self.easing.apply(progress) as f32;

                    scene.camera = Viewpoint::new(
                        lerp_vec3(from.position, to.position, eased),
                        lerp_vec3(from.look_at, to.look_at, eased),
                    );

                    if progress < 1.0 {
                        return false;
                    }
                    let boundary = self.state.phase_start_ms + duration;
                    if self.enter_phase(index + 1, boundary, scene) {
                        return true;
                    }
                }
            }
        }
    }

    /// Jump straight to the final viewpoint. No-op once complete.
    pub fn skip(&mut self, now_ms: f64, scene: &mut SceneState) -> bool {
        if self.state.is_complete {
            log::trace!("Camera skip ignored, intro already complete");
            return false;
        }
        self.complete(now_ms, true, scene)
    }

    /// Enter transition `index` at `start_ms`, or complete when none remain.
    /// Returns true if this completed the sequence.
    fn enter_phase(&mut self, index: usize, start_ms: f64, scene: &mut SceneState) -> bool {
        if index >= self.transition_count() {
            return self.complete(start_ms, false, scene);
        }
        self.state.phase = CameraPhase::Transitioning { index };
        self.state.phase_start_ms = start_ms;
        scene.push_event(SceneEvent::PhaseEntered {
            index,
            at_ms: start_ms,
        });
        log::debug!("Camera phase {} entered at {:.0}ms", index, start_ms);
        false
    }

    fn complete(&mut self, at_ms: f64, skipped: bool, scene: &mut SceneState) -> bool {
        if self.state.is_complete {
            return false;
        }
        self.state.phase = CameraPhase::Complete;
        self.state.phase_start_ms = at_ms;
        self.state.is_complete = true;
        scene.camera = self.final_viewpoint();
        scene.push_event(SceneEvent::IntroComplete { at_ms, skipped });
        log::info!(
            "Camera intro complete at {:.0}ms{}",
            at_ms,
            if skipped { " (skipped)" } else { "" }
        );
        true
    }
}
