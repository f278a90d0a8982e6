use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Overshoot constant of the ease-out-back curve.
const BACK_OVERSHOOT: f64 = 1.70158;

/// Animation style; picks both the easing curve and whether tweens run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimMode {
    Off,
    Linear,
    #[default]
    Soft,
    Snappy,
}

/// Progress curve captured by a tween when it is created.
pub type Easing = fn(f64) -> f64;

fn ease_off(_t: f64) -> f64 {
    1.0
}

fn ease_linear(t: f64) -> f64 {
    t
}

fn ease_soft(t: f64) -> f64 {
    (FRAC_PI_2 * t).sin()
}

fn ease_snappy(t: f64) -> f64 {
    let u = t - 1.0;
    1.0 + u * u * ((BACK_OVERSHOOT + 1.0) * u + BACK_OVERSHOOT)
}

impl AnimMode {
    pub const CYCLE: [AnimMode; 4] = [
        AnimMode::Soft,
        AnimMode::Snappy,
        AnimMode::Linear,
        AnimMode::Off,
    ];

    pub fn easing(self) -> Easing {
        match self {
            AnimMode::Off => ease_off,
            AnimMode::Linear => ease_linear,
            AnimMode::Soft => ease_soft,
            AnimMode::Snappy => ease_snappy,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::CYCLE.iter().position(|m| *m == self).unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            AnimMode::Off => "Off",
            AnimMode::Linear => "Linear",
            AnimMode::Soft => "Soft",
            AnimMode::Snappy => "Snappy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_ends_at_one() {
        for mode in AnimMode::CYCLE {
            assert_eq!((mode.easing())(1.0), 1.0, "{:?}", mode);
        }
    }

    #[test]
    fn off_jumps_immediately() {
        assert_eq!((AnimMode::Off.easing())(0.0), 1.0);
    }

    #[test]
    fn soft_is_sine_ease_out() {
        let p = (AnimMode::Soft.easing())(0.5);
        assert!((p - (std::f64::consts::PI / 4.0).sin()).abs() < 1e-12);
    }

    #[test]
    fn snappy_overshoots_before_settling() {
        let ease = AnimMode::Snappy.easing();
        assert!(ease(0.0).abs() < 1e-12);
        assert!(ease(0.8) > 1.0);
    }

    #[test]
    fn cycle_order_wraps() {
        assert_eq!(AnimMode::Soft.next(), AnimMode::Snappy);
        assert_eq!(AnimMode::Snappy.next(), AnimMode::Linear);
        assert_eq!(AnimMode::Linear.next(), AnimMode::Off);
        assert_eq!(AnimMode::Off.next(), AnimMode::Soft);
    }
}
