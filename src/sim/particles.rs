//! Confetti and candle smoke
//!
//! Confetti is a fixed pool created once from the seed and recycled forever.
//! Smoke comes in short-lived bursts, one per extinguished candle.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::{RngState, STREAM_CONFETTI, STREAM_SMOKE, index_seed, seeded_random};
use crate::consts::*;

/// Number of colors in the confetti palette
pub const CONFETTI_PALETTE_LEN: u32 = 8;

/// A falling paper square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfettiParticle {
    pub position: Vec3,
    /// Euler angles (radians)
    pub rotation: Vec3,
    pub scale: f32,
    pub fall_speed: f32,
    pub wobble_phase: f32,
    /// Palette index
    pub color: u32,
}

impl ConfettiParticle {
    /// Derive every attribute from hash seeds `base .. base + 9`
    pub fn from_seed(base: f64) -> Self {
        let r = |k: u32| (seeded_random(base + k as f64) as f32).min(1.0 - f32::EPSILON);
        let pi = std::f32::consts::PI;
        Self {
            position: Vec3::new((r(0) - 0.5) * 8.0, r(1) * 6.0 + 3.0, (r(2) - 0.5) * 8.0),
            rotation: Vec3::new(r(3) * pi, r(4) * pi, r(5) * pi),
            scale: 0.05 + r(6) * 0.08,
            fall_speed: 0.2 + r(7) * 0.3,
            wobble_phase: r(8) * 2.0,
            color: ((r(9) * CONFETTI_PALETTE_LEN as f32) as u32).min(CONFETTI_PALETTE_LEN - 1),
        }
    }
}

/// One puff of a smoke burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmokeParticle {
    pub id: u32,
    /// Delay after the burst was created before this puff appears
    pub start_delay_ms: f64,
    /// Units per second
    pub rising_speed: f32,
    pub horizontal_offset: f32,
    pub created_at_ms: f64,
    // Sampled each update
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

impl SmokeParticle {
    /// Time since this puff appeared (negative before its start delay)
    pub fn local_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.created_at_ms - self.start_delay_ms
    }

    /// Opacity after `local_ms`: fades linearly to zero at `lifetime_ms`
    pub fn opacity_at(local_ms: f64, lifetime_ms: f64) -> f32 {
        if local_ms < 0.0 || local_ms >= lifetime_ms {
            return 0.0;
        }
        (SMOKE_INITIAL_OPACITY as f64 * (1.0 - local_ms / lifetime_ms)).max(0.0) as f32
    }

    /// Recompute transform and opacity for `now_ms`
    pub fn sample(&mut self, now_ms: f64, lifetime_ms: f64, origin: Vec3) {
        let local_ms = self.local_ms(now_ms);
        if local_ms <= 0.0 {
            self.position = origin + Vec3::X * self.horizontal_offset;
            self.scale = SMOKE_BASE_SCALE;
            self.opacity = 0.0;
            return;
        }
        let t = (local_ms.min(lifetime_ms) / 1000.0) as f32;
        let drift = (t * SMOKE_DRIFT_FREQUENCY).sin() * SMOKE_DRIFT_AMPLITUDE;
        self.position = origin + Vec3::new(self.horizontal_offset + drift, t * self.rising_speed, 0.0);
        self.scale = SMOKE_BASE_SCALE + t * SMOKE_GROWTH;
        self.opacity = Self::opacity_at(local_ms, lifetime_ms);
    }
}

/// Smoke from one extinguished candle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeBurst {
    pub id: u32,
    pub candle_id: u32,
    pub origin: Vec3,
    pub created_at_ms: f64,
    pub particles: Vec<SmokeParticle>,
}

impl SmokeBurst {
    /// True once every puff has outlived `lifetime_ms`
    pub fn is_expired(&self, now_ms: f64, lifetime_ms: f64) -> bool {
        self.particles
            .iter()
            .all(|p| p.local_ms(now_ms) >= lifetime_ms)
    }
}

/// Smoke tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmokeSettings {
    pub particles_per_burst: u32,
    pub stagger_ms: f64,
    pub lifetime_ms: f64,
}

#[derive(Debug, Clone)]
pub struct ParticleSimulator {
    confetti: Vec<ConfettiParticle>,
    confetti_rng: Pcg32,
    smoke: Vec<SmokeBurst>,
    smoke_rng: Pcg32,
    smoke_settings: SmokeSettings,
    next_burst_id: u32,
    next_smoke_id: u32,
}

impl ParticleSimulator {
    pub fn new(seed: u64, confetti_count: usize, smoke_settings: SmokeSettings) -> Self {
        Self {
            confetti: Self::init_confetti(seed, confetti_count),
            confetti_rng: RngState::new(seed, STREAM_CONFETTI).to_rng(),
            smoke: Vec::new(),
            smoke_rng: RngState::new(seed, STREAM_SMOKE).to_rng(),
            smoke_settings,
            next_burst_id: 0,
            next_smoke_id: 0,
        }
    }

    /// Deterministic initial confetti pool, particle `i` addressable by index
    pub fn init_confetti(seed: u64, count: usize) -> Vec<ConfettiParticle> {
        (0..count)
            .map(|i| ConfettiParticle::from_seed(index_seed(seed, i)))
            .collect()
    }

    pub fn confetti(&self) -> &[ConfettiParticle] {
        &self.confetti
    }

    pub fn smoke_bursts(&self) -> &[SmokeBurst] {
        &self.smoke
    }

    /// Visible smoke puffs across all live bursts
    pub fn active_smoke(&self) -> impl Iterator<Item = &SmokeParticle> {
        self.smoke
            .iter()
            .flat_map(|b| b.particles.iter())
            .filter(|p| p.opacity > 0.0)
    }

    /// Advance confetti one tick. `elapsed_s` drives the sideways wobble.
    pub fn update_confetti(&mut self, elapsed_s: f32) {
        for p in &mut self.confetti {
            p.position.y -= p.fall_speed * CONFETTI_FALL_STEP;
            p.position.x += (elapsed_s + p.wobble_phase).sin() * CONFETTI_WOBBLE_AMPLITUDE;
            p.rotation.x += CONFETTI_SPIN_X;
            p.rotation.z += CONFETTI_SPIN_Z;

            if p.position.y < CONFETTI_FLOOR {
                p.position.y = CONFETTI_CEILING + self.confetti_rng.random::<f32>() * CONFETTI_RESET_SPREAD;
                p.position.x = (self.confetti_rng.random::<f32>() - 0.5) * CONFETTI_RESET_WIDTH;
            }
        }
    }

    /// Start a burst rising from `origin`. Returns the burst id.
    pub fn spawn_smoke(&mut self, candle_id: u32, origin: Vec3, at_ms: f64) -> u32 {
        let burst_id = self.next_burst_id;
        self.next_burst_id += 1;

        let settings = self.smoke_settings;
        let particles = (0..settings.particles_per_burst)
            .map(|i| {
                let id = self.next_smoke_id;
                self.next_smoke_id += 1;
                let jitter = if settings.stagger_ms > 0.0 {
                    self.smoke_rng.random_range(0.0..settings.stagger_ms * 0.5)
                } else {
                    0.0
                };
                SmokeParticle {
                    id,
                    start_delay_ms: i as f64 * settings.stagger_ms + jitter,
                    rising_speed: 0.3 + self.smoke_rng.random::<f32>() * 0.2,
                    horizontal_offset: (self.smoke_rng.random::<f32>() - 0.5) * 0.3,
                    created_at_ms: at_ms,
                    position: origin,
                    scale: SMOKE_BASE_SCALE,
                    opacity: 0.0,
                }
            })
            .collect();

        self.smoke.push(SmokeBurst {
            id: burst_id,
            candle_id,
            origin,
            created_at_ms: at_ms,
            particles,
        });
        log::debug!("Smoke burst {} from candle {}", burst_id, candle_id);
        burst_id
    }

    /// Advance all bursts to `now_ms` and drop the expired ones
    pub fn update_smoke(&mut self, now_ms: f64) {
        let lifetime = self.smoke_settings.lifetime_ms;
        for burst in &mut self.smoke {
            let origin = burst.origin;
            for p in &mut burst.particles {
                p.sample(now_ms, lifetime, origin);
            }
        }
        self.smoke.retain(|b| !b.is_expired(now_ms, lifetime));
    }

    /// Per-tick update shared by the controller
    pub fn update(&mut self, now_ms: f64, confetti_active: bool) {
        if confetti_active {
            self.update_confetti((now_ms / 1000.0) as f32);
        }
        self.update_smoke(now_ms);
    }
}
