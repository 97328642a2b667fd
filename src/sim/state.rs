//! Scene state and events
//!
//! `SceneState` is the single explicit snapshot the engine components write into.
//! The rendering collaborator only ever reads it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::effects::{CandleState, TimerState};

/// Camera position plus the point it looks at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Viewpoint {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

/// High level stage of the celebration, derived from the engine components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenePhase {
    /// Camera fly-through running (or holding before it starts)
    Intro,
    /// Free look, candles lit, waiting for the wish
    AwaitingWish,
    /// Candle cascade in progress
    Blowing,
    /// All candles out, confetti falling
    Celebrating,
}

impl ScenePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenePhase::Intro => "intro",
            ScenePhase::AwaitingWish => "awaiting_wish",
            ScenePhase::Blowing => "blowing",
            ScenePhase::Celebrating => "celebrating",
        }
    }
}

/// Something observable happened. Each event is emitted exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneEvent {
    /// Camera left the opening viewpoint
    IntroStarted { at_ms: f64 },
    /// Camera began transition `index` (0-based)
    PhaseEntered { index: usize, at_ms: f64 },
    /// Fly-through finished or was skipped
    IntroComplete { at_ms: f64, skipped: bool },
    /// Candle cascade scheduled
    CascadeStarted {
        at_ms: f64,
        candles: usize,
        automatic: bool,
    },
    CandleExtinguished { id: u32, at_ms: f64 },
    /// Every candle is out and the settle margin has passed
    CandlesBlown { at_ms: f64 },
    CountdownTick { remaining: u32 },
    CountdownExpired { at_ms: f64 },
    /// Countdown stopped by a manual blow
    CountdownCancelled { remaining: u32 },
    SmokeSpawned { burst_id: u32, candle_id: u32 },
    Disposed,
}

/// Everything the renderer needs besides particle buffers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    /// Clock value of the last accepted tick
    pub elapsed_ms: f64,
    /// Delta of the last accepted tick
    pub delta_ms: f64,
    pub tick_count: u64,
    pub phase: ScenePhase,
    pub camera: Viewpoint,
    pub candles: Vec<CandleState>,
    pub countdown: TimerState,
    pub confetti_active: bool,
    /// Pending events, oldest first, until drained by the consumer
    pub events: Vec<SceneEvent>,
}

impl SceneState {
    pub fn new(camera: Viewpoint, candles: Vec<CandleState>, countdown: TimerState) -> Self {
        Self {
            elapsed_ms: 0.0,
            delta_ms: 0.0,
            tick_count: 0,
            phase: ScenePhase::Intro,
            camera,
            candles,
            countdown,
            confetti_active: false,
            events: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn lit_count(&self) -> usize {
        self.candles.iter().filter(|c| c.lit).count()
    }

    pub fn any_lit(&self) -> bool {
        self.candles.iter().any(|c| c.lit)
    }

    pub fn candle(&self, id: u32) -> Option<&CandleState> {
        self.candles.iter().find(|c| c.id == id)
    }
}
