use crate::math::{AngleHelper, StatsHelper};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How a signal's values combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Scalar,
    Angle,
}

/// Every aggregated signal on the dashboard. The kind of each key is fixed
/// here, so a push can never reinterpret accumulated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKey {
    VehSpd,
    VehHdg,
    VehLat,
    VehLon,
    Temp,
    Wind,
    WindDir,
    Ac2Spd,
    Ac2Hdg,
    Ac2Lat,
    Ac2Lon,
}

impl SignalKey {
    pub const ALL: [SignalKey; 11] = [
        SignalKey::VehSpd,
        SignalKey::VehHdg,
        SignalKey::VehLat,
        SignalKey::VehLon,
        SignalKey::Temp,
        SignalKey::Wind,
        SignalKey::WindDir,
        SignalKey::Ac2Spd,
        SignalKey::Ac2Hdg,
        SignalKey::Ac2Lat,
        SignalKey::Ac2Lon,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn kind(self) -> SignalKind {
        match self {
            SignalKey::VehHdg | SignalKey::WindDir | SignalKey::Ac2Hdg => SignalKind::Angle,
            _ => SignalKind::Scalar,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignalKey::VehSpd => "veh_spd",
            SignalKey::VehHdg => "veh_hdg",
            SignalKey::VehLat => "veh_lat",
            SignalKey::VehLon => "veh_lon",
            SignalKey::Temp => "temp",
            SignalKey::Wind => "wind",
            SignalKey::WindDir => "wind_dir",
            SignalKey::Ac2Spd => "ac2_spd",
            SignalKey::Ac2Hdg => "ac2_hdg",
            SignalKey::Ac2Lat => "ac2_lat",
            SignalKey::Ac2Lon => "ac2_lon",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    at: Duration,
    value: f64,
}

/// Rolling window plus time-adaptive EMA for one signal.
#[derive(Debug, Clone)]
pub struct SignalState {
    kind: SignalKind,
    samples: VecDeque<Sample>,
    ema: f64,
    last_push: Duration,
}

impl SignalState {
    /// Smallest Δt fed to the EMA coefficient, in seconds.
    const MIN_DT_SECS: f64 = 0.001;

    pub fn new(kind: SignalKind, value: f64, now: Duration) -> Self {
        Self {
            kind,
            samples: VecDeque::new(),
            ema: value,
            last_push: now,
        }
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn push(&mut self, value: f64, now: Duration, horizon: Duration) {
        self.samples.push_back(Sample { at: now, value });
        self.prune(now, horizon);

        let dt = now
            .saturating_sub(self.last_push)
            .as_secs_f64()
            .max(Self::MIN_DT_SECS);
        let alpha = 1.0 - (-dt / horizon.as_secs_f64()).exp();
        self.ema = match self.kind {
            SignalKind::Angle => AngleHelper::normalize_deg(
                self.ema + alpha * AngleHelper::shortest_delta(self.ema, value),
            ),
            SignalKind::Scalar => self.ema + alpha * (value - self.ema),
        };
        self.last_push = now;
    }

    fn prune(&mut self, now: Duration, horizon: Duration) {
        let Some(cutoff) = now.checked_sub(horizon) else {
            return;
        };
        while self.samples.front().is_some_and(|s| s.at < cutoff) {
            self.samples.pop_front();
        }
    }

    /// Window mean: circular for angles, arithmetic otherwise.
    pub fn window_mean(&self) -> Option<f64> {
        let values = self.samples.iter().map(|s| s.value);
        match self.kind {
            SignalKind::Angle => AngleHelper::circular_mean(values),
            SignalKind::Scalar => StatsHelper::mean(values),
        }
    }

    pub fn ema(&self) -> f64 {
        self.ema
    }

    pub fn window_len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    fn oldest_sample_at(&self) -> Option<Duration> {
        self.samples.front().map(|s| s.at)
    }
}
