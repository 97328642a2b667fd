//! Easing curves
//!
//! Each curve maps linear progress in [0, 1] onto [0, 1] with
//! `apply(0) == 0` and `apply(1) == 1`.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    QuadInOut,
    #[default]
    CubicInOut,
    SineInOut,
}

impl Easing {
    /// Remap progress. Input is clamped first.
    pub fn apply(self, t: f64) -> f64 {
        let t = crate::clamp01(t);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::QuadInOut,
        Easing::CubicInOut,
        Easing::SineInOut,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-12, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{easing:?}");
        }
    }

    #[test]
    fn test_cubic_midpoint_and_shape() {
        let e = Easing::CubicInOut;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((e.apply(0.25) - 0.0625).abs() < 1e-12);
        assert!((e.apply(0.75) - 0.9375).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(Easing::CubicInOut.apply(-3.0), 0.0);
        assert_eq!(Easing::CubicInOut.apply(7.5), 1.0);
    }

    proptest! {
        #[test]
        fn prop_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for easing in ALL {
                prop_assert!(easing.apply(lo) <= easing.apply(hi) + 1e-12);
            }
        }
    }
}
