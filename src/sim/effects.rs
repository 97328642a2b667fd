//! Timed effects: candle cascade and wish countdown
//!
//! Both mechanisms run on deferred timers held in one `TimerRegistry`, so a single
//! `dispose()` cancels everything still outstanding.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::{RngState, STREAM_CASCADE};
use super::state::{SceneEvent, SceneState};
use super::timers::{TimerHandle, TimerRegistry};
use crate::consts::*;

/// A candle on the cake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleState {
    pub id: u32,
    pub lit: bool,
    /// Base of the candle in cake space
    pub position: Vec3,
}

impl CandleState {
    /// Where smoke starts when this candle goes out
    pub fn wick(&self) -> Vec3 {
        self.position + Vec3::Y * WICK_HEIGHT
    }
}

/// Countdown to the automatic wish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub active: bool,
}

impl TimerState {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining_seconds: seconds,
            active: seconds > 0,
        }
    }

    pub fn inactive() -> Self {
        Self {
            remaining_seconds: 0,
            active: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CascadeState {
    /// Nothing blown yet
    Ready,
    /// Extinguish timers pending
    Running { started_at_ms: f64, candles: usize },
    /// Terminal: all candles out, blown event delivered
    Blown { at_ms: f64 },
}

/// Payload of a deferred effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Extinguish { id: u32 },
    CascadeSettled,
    CountdownTick,
}

/// Candle placement on the top tier
///
/// Up to five candles use the classic arrangement, more are spread on a ring.
pub fn candle_positions(count: u32) -> Vec<Vec3> {
    const CLASSIC: [Vec3; 5] = [
        Vec3::new(0.0, CANDLE_HEIGHT, 0.0),
        Vec3::new(0.15, CANDLE_HEIGHT, 0.1),
        Vec3::new(-0.15, CANDLE_HEIGHT, 0.1),
        Vec3::new(0.1, CANDLE_HEIGHT, -0.12),
        Vec3::new(-0.1, CANDLE_HEIGHT, -0.12),
    ];

    if count as usize <= CLASSIC.len() {
        return CLASSIC[..count as usize].to_vec();
    }
    (0..count)
        .map(|i| {
            let theta = i as f32 / count as f32 * std::f32::consts::TAU;
            Vec3::new(
                theta.cos() * CANDLE_RING_RADIUS,
                CANDLE_HEIGHT,
                theta.sin() * CANDLE_RING_RADIUS,
            )
        })
        .collect()
}

/// Build `count` lit candles
pub fn light_candles(count: u32) -> Vec<CandleState> {
    candle_positions(count)
        .into_iter()
        .enumerate()
        .map(|(i, position)| CandleState {
            id: i as u32,
            lit: true,
            position,
        })
        .collect()
}

/// Cascade timing knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeTiming {
    pub base_delay_ms: f64,
    pub jitter_max_ms: f64,
    pub settle_margin_ms: f64,
}

#[derive(Debug, Clone)]
pub struct EffectScheduler {
    timers: TimerRegistry<Deferred>,
    rng: Pcg32,
    timing: CascadeTiming,
    cascade: CascadeState,
    countdown_handle: Option<TimerHandle>,
    disposed: bool,
}

impl EffectScheduler {
    pub fn new(timing: CascadeTiming, seed: u64) -> Self {
        Self {
            timers: TimerRegistry::new(),
            rng: RngState::new(seed, STREAM_CASCADE).to_rng(),
            timing,
            cascade: CascadeState::Ready,
            countdown_handle: None,
            disposed: false,
        }
    }

    pub fn cascade(&self) -> CascadeState {
        self.cascade
    }

    pub fn is_blown(&self) -> bool {
        matches!(self.cascade, CascadeState::Blown { .. })
    }

    /// Deferred effects still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Latest time the cascade can finish, measured from the blow
    pub fn worst_case_cascade_ms(&self, candles: usize) -> f64 {
        candles.saturating_sub(1) as f64 * self.timing.base_delay_ms
            + self.timing.jitter_max_ms
            + self.timing.settle_margin_ms
    }

    /// Arm the countdown from `scene.countdown`, first tick one second after `now_ms`
    pub fn start_countdown(&mut self, now_ms: f64, scene: &mut SceneState) {
        if self.disposed || !scene.countdown.active || self.countdown_handle.is_some() {
            return;
        }
        let handle = self
            .timers
            .schedule(now_ms + COUNTDOWN_TICK_MS, Deferred::CountdownTick);
        self.countdown_handle = Some(handle);
        log::debug!("Countdown armed: {}s", scene.countdown.remaining_seconds);
    }

    /// Blow out the candles. Ignored if nothing is lit or a cascade already ran.
    pub fn blow(&mut self, now_ms: f64, scene: &mut SceneState) -> bool {
        self.start_cascade(now_ms, scene, false)
    }

    /// Fire every deferred effect due at or before `now_ms`
    pub fn update(&mut self, now_ms: f64, scene: &mut SceneState) {
        while let Some((_, due_ms, deferred)) = self.timers.pop_due(now_ms) {
            match deferred {
                Deferred::Extinguish { id } => {
                    if let Some(candle) = scene.candles.iter_mut().find(|c| c.id == id) {
                        if candle.lit {
                            candle.lit = false;
                            scene.push_event(SceneEvent::CandleExtinguished { id, at_ms: due_ms });
                            log::debug!("Candle {} out at {:.0}ms", id, due_ms);
                        }
                    }
                }
                Deferred::CascadeSettled => {
                    if matches!(self.cascade, CascadeState::Running { .. }) {
                        self.cascade = CascadeState::Blown { at_ms: due_ms };
                        scene.push_event(SceneEvent::CandlesBlown { at_ms: due_ms });
                        log::info!("All candles blown at {:.0}ms", due_ms);
                    }
                }
                Deferred::CountdownTick => self.countdown_tick(due_ms, scene),
            }
        }
    }

    /// Cancel all outstanding timers and stop the countdown. Later calls are no-ops.
    pub fn dispose(&mut self, scene: &mut SceneState) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let cancelled = self.timers.cancel_all();
        self.countdown_handle = None;
        scene.countdown.active = false;
        log::info!("Effects disposed, {} pending timers cancelled", cancelled);
    }

    fn countdown_tick(&mut self, due_ms: f64, scene: &mut SceneState) {
        self.countdown_handle = None;
        if !scene.countdown.active {
            return;
        }
        let remaining = scene.countdown.remaining_seconds.saturating_sub(1);
        scene.countdown.remaining_seconds = remaining;
        scene.push_event(SceneEvent::CountdownTick { remaining });

        if remaining > 0 {
            let handle = self
                .timers
                .schedule(due_ms + COUNTDOWN_TICK_MS, Deferred::CountdownTick);
            self.countdown_handle = Some(handle);
            return;
        }

        scene.countdown.active = false;
        scene.push_event(SceneEvent::CountdownExpired { at_ms: due_ms });
        log::info!("Countdown expired, blowing candles");
        self.start_cascade(due_ms, scene, true);
    }

    fn stop_countdown(&mut self, scene: &mut SceneState) {
        if let Some(handle) = self.countdown_handle.take() {
            self.timers.cancel(handle);
        }
        if scene.countdown.active {
            scene.countdown.active = false;
            scene.push_event(SceneEvent::CountdownCancelled {
                remaining: scene.countdown.remaining_seconds,
            });
            log::debug!(
                "Countdown cancelled with {}s left",
                scene.countdown.remaining_seconds
            );
        }
    }

    fn start_cascade(&mut self, now_ms: f64, scene: &mut SceneState, automatic: bool) -> bool {
        if self.disposed || self.cascade != CascadeState::Ready {
            log::trace!("Blow ignored, cascade already triggered");
            return false;
        }
        let lit: Vec<u32> = scene
            .candles
            .iter()
            .filter(|c| c.lit)
            .map(|c| c.id)
            .collect();
        if lit.is_empty() {
            log::trace!("Blow ignored, no lit candles");
            return false;
        }
        if !automatic {
            self.stop_countdown(scene);
        }

        for (i, &id) in lit.iter().enumerate() {
            let jitter = if self.timing.jitter_max_ms > 0.0 {
                self.rng.random_range(0.0..self.timing.jitter_max_ms)
            } else {
                0.0
            };
            let due = now_ms + i as f64 * self.timing.base_delay_ms + jitter;
            self.timers.schedule(due, Deferred::Extinguish { id });
        }
        let settle_at = now_ms + self.worst_case_cascade_ms(lit.len());
        self.timers.schedule(settle_at, Deferred::CascadeSettled);

        self.cascade = CascadeState::Running {
            started_at_ms: now_ms,
            candles: lit.len(),
        };
        scene.push_event(SceneEvent::CascadeStarted {
            at_ms: now_ms,
            candles: lit.len(),
            automatic,
        });
        log::info!(
            "Candle cascade started ({} candles, {})",
            lit.len(),
            if automatic { "countdown" } else { "manual" }
        );
        true
    }
}
