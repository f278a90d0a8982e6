use crate::animation::AnimMode;
use crate::math::StatsHelper;
use std::time::Duration;

pub const MIN_ANIM_MS: f64 = 120.0;
pub const MAX_ANIM_MS: f64 = 1200.0;
pub const FALLBACK_ANIM_MS: f64 = 400.0;

/// Estimates how fast the feed updates, from arrival gaps or the
/// publisher's own rate hint.
#[derive(Debug, Clone, Default)]
pub struct CadenceEstimator {
    last_arrival: Option<Duration>,
    ema_dt_ms: Option<f64>,
    hinted_hz: Option<f64>,
}

impl CadenceEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes a message arrival at `now`. A positive `hint_hz` replaces the
    /// previous hint; a missing one keeps it.
    pub fn record_arrival(&mut self, now: Duration, hint_hz: Option<f64>) {
        if let Some(last) = self.last_arrival {
            let gap_ms = now.saturating_sub(last).as_secs_f64() * 1000.0;
            self.ema_dt_ms = Some(match self.ema_dt_ms {
                Some(ema) => 0.9 * ema + 0.1 * gap_ms,
                None => gap_ms,
            });
        }
        self.last_arrival = Some(now);
        if let Some(hz) = hint_hz.filter(|hz| hz.is_finite() && *hz > 0.0) {
            self.hinted_hz = Some(hz);
        }
    }

    pub fn ema_dt_ms(&self) -> Option<f64> {
        self.ema_dt_ms
    }

    pub fn hinted_hz(&self) -> Option<f64> {
        self.hinted_hz
    }

    /// Best guess of the feed rate in Hz, preferring the hint.
    pub fn rate_hz(&self) -> Option<f64> {
        self.hinted_hz.or_else(|| {
            self.ema_dt_ms
                .filter(|dt| *dt > 0.0)
                .map(|dt| 1000.0 / dt)
        })
    }

    /// Tween length matching the feed cadence, zero when animation is off.
    pub fn anim_duration(&self, mode: AnimMode) -> Duration {
        if mode == AnimMode::Off {
            return Duration::ZERO;
        }
        let ms = if let Some(hz) = self.hinted_hz {
            StatsHelper::clamp(1000.0 / hz, MIN_ANIM_MS, MAX_ANIM_MS)
        } else if let Some(dt) = self.ema_dt_ms.filter(|dt| *dt > 0.0) {
            StatsHelper::clamp(dt, MIN_ANIM_MS, MAX_ANIM_MS)
        } else {
            FALLBACK_ANIM_MS
        };
        Duration::from_secs_f64(ms / 1000.0)
    }
}
