//! Scene tick
//!
//! `SceneController` owns every engine component plus the shared `SceneState`
//! and drives them from the caller's clock. One tick runs, in order:
//! camera, deferred effects, reactions to new events, particles. All of them
//! see the same clock value.

use super::camera::CameraSequencer;
use super::effects::{CascadeState, EffectScheduler, TimerState, light_candles};
use super::particles::ParticleSimulator;
use super::state::{ScenePhase, SceneEvent, SceneState};
use crate::config::SceneConfig;
use crate::renderer::FrameSnapshot;

pub struct SceneController {
    config: SceneConfig,
    seed: u64,
    camera: CameraSequencer,
    effects: EffectScheduler,
    particles: ParticleSimulator,
    state: SceneState,
    disposed: bool,
}

impl SceneController {
    /// Build a scene at clock zero. The countdown is armed immediately.
    pub fn new(config: SceneConfig) -> Self {
        let config = config.sanitized();
        let seed = config.resolve_seed();

        let camera = CameraSequencer::new(config.keyframes(), config.easing, config.intro_delay_ms);
        let effects = EffectScheduler::new(config.cascade_timing(), seed);
        let particles = ParticleSimulator::new(
            seed,
            config.effective_confetti_count(),
            config.smoke_settings(),
        );
        let mut state = SceneState::new(
            camera.initial_viewpoint(),
            light_candles(config.effective_candle_count()),
            TimerState::new(config.countdown_seconds),
        );
        state.confetti_active = !config.confetti_on_blow;

        let mut scene = Self {
            config,
            seed,
            camera,
            effects,
            particles,
            state,
            disposed: false,
        };
        scene.effects.start_countdown(0.0, &mut scene.state);
        log::info!(
            "Scene ready: {} candles, {} confetti, seed {}",
            scene.state.candles.len(),
            scene.particles.confetti().len(),
            seed
        );
        scene
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Seed actually in use (resolved from entropy if the config had none)
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn camera(&self) -> &CameraSequencer {
        &self.camera
    }

    pub fn effects(&self) -> &EffectScheduler {
        &self.effects
    }

    pub fn particles(&self) -> &ParticleSimulator {
        &self.particles
    }

    pub fn phase(&self) -> ScenePhase {
        self.state.phase
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Advance the scene to `elapsed_ms`.
    ///
    /// Ticks that are non-finite, negative or run backwards are skipped.
    /// Returns true if the tick was applied.
    pub fn tick(&mut self, elapsed_ms: f64, delta_ms: f64) -> bool {
        if self.disposed {
            return false;
        }
        if !elapsed_ms.is_finite()
            || !delta_ms.is_finite()
            || elapsed_ms < 0.0
            || delta_ms < 0.0
            || elapsed_ms < self.state.elapsed_ms
        {
            log::trace!("Skipping malformed tick ({}, {})", elapsed_ms, delta_ms);
            return false;
        }

        self.state.elapsed_ms = elapsed_ms;
        self.state.delta_ms = delta_ms;
        self.state.tick_count += 1;

        let mark = self.state.events.len();
        self.camera.advance(elapsed_ms, &mut self.state);
        self.effects.update(elapsed_ms, &mut self.state);
        self.react(mark);
        self.particles.update(elapsed_ms, self.state.confetti_active);
        self.refresh_phase();
        true
    }

    /// Blow out the candles (manual wish)
    pub fn blow(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let blown = self.effects.blow(self.state.elapsed_ms, &mut self.state);
        self.refresh_phase();
        blown
    }

    /// Jump the camera to the end of the fly-through
    pub fn skip_intro(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let skipped = self.camera.skip(self.state.elapsed_ms, &mut self.state);
        self.refresh_phase();
        skipped
    }

    /// Tear down: cancel deferred effects and stop the countdown. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.effects.dispose(&mut self.state);
        self.state.push_event(SceneEvent::Disposed);
        self.disposed = true;
    }

    /// Take pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.state.drain_events()
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.state, &self.particles, self.camera.is_complete())
    }

    /// Apply cross-component consequences of events emitted since `mark`
    fn react(&mut self, mark: usize) {
        let mut spawned = Vec::new();
        for event in &self.state.events[mark..] {
            match *event {
                SceneEvent::CandleExtinguished { id, at_ms } => {
                    if let Some(candle) = self.state.candle(id) {
                        let burst_id = self.particles.spawn_smoke(id, candle.wick(), at_ms);
                        spawned.push(SceneEvent::SmokeSpawned {
                            burst_id,
                            candle_id: id,
                        });
                    }
                }
                SceneEvent::CandlesBlown { .. } => {
                    if !self.state.confetti_active {
                        log::info!("Confetti released");
                    }
                    self.state.confetti_active = true;
                }
                _ => {}
            }
        }
        self.state.events.extend(spawned);
    }

    fn refresh_phase(&mut self) {
        self.state.phase = match self.effects.cascade() {
            CascadeState::Blown { .. } => ScenePhase::Celebrating,
            CascadeState::Running { .. } => ScenePhase::Blowing,
            CascadeState::Ready if !self.camera.is_complete() => ScenePhase::Intro,
            CascadeState::Ready => ScenePhase::AwaitingWish,
        };
    }
}
