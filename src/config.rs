//! Scene configuration
//!
//! Supplied once at start-up, either from defaults or a JSON document.
//! Invalid values are clamped, never rejected.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CANDLES;
use crate::sim::camera::{Keyframe, default_keyframes};
use crate::sim::effects::CascadeTiming;
use crate::sim::particles::SmokeSettings;
use crate::sim::rng::entropy_seed;
use crate::sim::Easing;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Multiplier applied to the configured confetti count
    pub fn confetti_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 2.0,
        }
    }

    /// Multiplier applied to puffs per smoke burst
    pub fn smoke_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    // === Celebration ===
    /// Used for the candle count when `candle_count` is unset
    pub person_age: i32,
    pub candle_count: Option<i32>,
    /// Seconds before the candles blow themselves out (0 disables)
    pub countdown_seconds: u32,

    // === Camera ===
    pub keyframes: Vec<Keyframe>,
    /// Per-transition override of keyframe durations, in order
    pub phase_durations_ms: Option<Vec<u64>>,
    pub easing: Easing,
    /// Hold on the first keyframe before the fly-through starts
    pub intro_delay_ms: u64,

    // === Candle cascade ===
    pub stagger_base_delay_ms: u64,
    pub stagger_jitter_max_ms: u64,
    /// Extra wait after the last possible extinguish before the blown event
    pub cascade_settle_margin_ms: u64,

    // === Particles ===
    pub confetti_count: u32,
    /// Hold confetti until the candles are blown
    pub confetti_on_blow: bool,
    pub smoke_particle_count: u32,
    pub smoke_stagger_ms: u64,
    pub smoke_lifetime_ms: u64,
    pub quality: Option<QualityPreset>,

    /// Fixed seed for reproducible runs; entropy when unset
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            person_age: 21,
            candle_count: Some(5),
            countdown_seconds: 60,

            keyframes: default_keyframes(),
            phase_durations_ms: None,
            easing: Easing::CubicInOut,
            intro_delay_ms: 500,

            stagger_base_delay_ms: 200,
            stagger_jitter_max_ms: 300,
            cascade_settle_margin_ms: 400,

            confetti_count: 80,
            confetti_on_blow: true,
            smoke_particle_count: 8,
            smoke_stagger_ms: 100,
            smoke_lifetime_ms: 2000,
            quality: None,

            seed: None,
        }
    }
}

impl SceneConfig {
    /// Parse a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse JSON, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Invalid scene config ({}), using defaults", err);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Same config with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Clamp every field into its usable range
    pub fn sanitized(mut self) -> Self {
        let candles = self.effective_candle_count();
        if self.candle_count.is_some_and(|c| c != candles as i32) {
            log::warn!("candle_count clamped to {}", candles);
            self.candle_count = Some(candles as i32);
        }
        if self.keyframes.is_empty() {
            log::warn!("No keyframes configured, using default fly-through");
            self.keyframes = default_keyframes();
        }
        if self.smoke_particle_count == 0 {
            log::warn!("smoke_particle_count clamped to 1");
            self.smoke_particle_count = 1;
        }
        if self.smoke_lifetime_ms == 0 {
            log::warn!("smoke_lifetime_ms clamped to 1");
            self.smoke_lifetime_ms = 1;
        }
        self
    }

    /// Candles on the cake: explicit count, else age, clamped to [1, MAX_CANDLES]
    pub fn effective_candle_count(&self) -> u32 {
        self.candle_count
            .unwrap_or(self.person_age)
            .clamp(1, MAX_CANDLES as i32) as u32
    }

    pub fn effective_confetti_count(&self) -> usize {
        let scale = self.quality.unwrap_or_default().confetti_scale();
        (self.confetti_count as f32 * scale).round() as usize
    }

    pub fn effective_smoke_count(&self) -> u32 {
        let scale = self.quality.unwrap_or_default().smoke_scale();
        ((self.smoke_particle_count as f32 * scale).round() as u32).max(1)
    }

    /// Keyframes with `phase_durations_ms` applied; entry `i` times transition `i`
    pub fn keyframes(&self) -> Vec<Keyframe> {
        let mut keyframes = if self.keyframes.is_empty() {
            default_keyframes()
        } else {
            self.keyframes.clone()
        };
        if let Some(durations) = &self.phase_durations_ms {
            for (keyframe, &duration) in keyframes.iter_mut().skip(1).zip(durations) {
                keyframe.duration_ms = duration;
            }
        }
        keyframes
    }

    pub fn cascade_timing(&self) -> CascadeTiming {
        CascadeTiming {
            base_delay_ms: self.stagger_base_delay_ms as f64,
            jitter_max_ms: self.stagger_jitter_max_ms as f64,
            settle_margin_ms: self.cascade_settle_margin_ms as f64,
        }
    }

    pub fn smoke_settings(&self) -> SmokeSettings {
        SmokeSettings {
            particles_per_burst: self.effective_smoke_count(),
            stagger_ms: self.smoke_stagger_ms as f64,
            lifetime_ms: self.smoke_lifetime_ms.max(1) as f64,
        }
    }

    /// Configured seed, or a fresh one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(entropy_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_celebration() {
        let config = SceneConfig::default();
        assert_eq!(config.effective_candle_count(), 5);
        assert_eq!(config.effective_confetti_count(), 80);
        assert_eq!(config.keyframes().len(), 4);
        assert_eq!(config.countdown_seconds, 60);
    }

    #[test]
    fn test_candle_count_falls_back_to_age() {
        let config = SceneConfig {
            candle_count: None,
            person_age: 21,
            ..Default::default()
        };
        assert_eq!(config.effective_candle_count(), 21);
    }

    #[test]
    fn test_candle_count_clamped() {
        let config = SceneConfig {
            candle_count: Some(-3),
            ..Default::default()
        };
        assert_eq!(config.effective_candle_count(), 1);
        assert_eq!(config.sanitized().candle_count, Some(1));

        let config = SceneConfig {
            candle_count: None,
            person_age: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_candle_count(), 1);

        let config = SceneConfig {
            candle_count: Some(500),
            ..Default::default()
        };
        assert_eq!(config.effective_candle_count(), MAX_CANDLES);
    }

    #[test]
    fn test_partial_json() {
        let config = SceneConfig::from_json(r#"{"candle_count": 3, "seed": 42}"#).unwrap();
        assert_eq!(config.effective_candle_count(), 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.confetti_count, 80);
    }

    #[test]
    fn test_keyframes_from_json() {
        let json = r#"{
            "keyframes": [
                {"position": [0, 1, 2], "look_at": [0, 0, 0], "duration_ms": 0},
                {"position": [3, 4, 5], "look_at": [0, 1, 0], "duration_ms": 900}
            ],
            "easing": "linear"
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.keyframes().len(), 2);
        assert_eq!(config.keyframes()[1].duration_ms, 900);
        assert_eq!(config.easing, Easing::Linear);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let config = SceneConfig::from_json_or_default("{ not json");
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SceneConfig::default().with_seed(7);
        let json = config.to_json().unwrap();
        assert_eq!(SceneConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_phase_duration_override() {
        let config = SceneConfig {
            phase_durations_ms: Some(vec![100, 200]),
            ..Default::default()
        };
        let durations: Vec<u64> = config.keyframes().iter().map(|k| k.duration_ms).collect();
        assert_eq!(durations, vec![0, 100, 200, 2000]);
    }

    #[test]
    fn test_quality_scales_particles() {
        let low = SceneConfig {
            quality: Some(QualityPreset::Low),
            ..Default::default()
        };
        let high = SceneConfig {
            quality: Some(QualityPreset::High),
            ..Default::default()
        };
        assert_eq!(low.effective_confetti_count(), 40);
        assert_eq!(high.effective_confetti_count(), 160);
        assert_eq!(low.effective_smoke_count(), 4);
        assert_eq!(QualityPreset::from_str("HIGH"), Some(QualityPreset::High));
    }

    #[test]
    fn test_sanitize_zero_counts() {
        let config = SceneConfig {
            smoke_particle_count: 0,
            smoke_lifetime_ms: 0,
            keyframes: Vec::new(),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.smoke_particle_count, 1);
        assert_eq!(config.smoke_lifetime_ms, 1);
        assert_eq!(config.keyframes.len(), 4);
    }
}
