use crate::aggregation::signal::{SignalKey, SignalState};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_HORIZON: Duration = Duration::from_secs(10);

/// What the dashboard shows for an aggregated signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Latest raw value.
    #[default]
    Normal,
    /// Mean over the trailing horizon.
    Avg,
    /// Time-adaptive exponential moving average.
    Ema,
}

impl AggregationMode {
    pub const CYCLE: [AggregationMode; 3] = [
        AggregationMode::Normal,
        AggregationMode::Avg,
        AggregationMode::Ema,
    ];

    pub fn next(self) -> Self {
        let idx = Self::CYCLE.iter().position(|m| *m == self).unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }

    pub fn label(self, horizon: Duration) -> String {
        let secs = horizon.as_secs_f64();
        match self {
            AggregationMode::Normal => "Normal".to_string(),
            AggregationMode::Avg => format!("Avg ({secs}s)"),
            AggregationMode::Ema => format!("EMA ({secs}s)"),
        }
    }
}

/// Per-signal history for every [`SignalKey`].
///
/// Window and EMA are always maintained; the mode only decides what
/// [`value`](Self::value) reads, so switching modes reflects past data at once.
#[derive(Debug, Clone)]
pub struct SignalAggregator {
    mode: AggregationMode,
    horizon: Duration,
    signals: [Option<SignalState>; SignalKey::COUNT],
}

impl SignalAggregator {
    pub fn new(horizon: Duration) -> Self {
        Self {
            mode: AggregationMode::default(),
            horizon,
            signals: std::array::from_fn(|_| None),
        }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AggregationMode) {
        self.mode = mode;
    }

    pub fn horizon(&self) -> Duration {
        self.horizon
    }

    /// Records `value` at `now`. Non-finite values are ignored.
    pub fn push(&mut self, key: SignalKey, value: f64, now: Duration) {
        if !value.is_finite() {
            return;
        }
        let horizon = self.horizon;
        self.signals[key.index()]
            .get_or_insert_with(|| SignalState::new(key.kind(), value, now))
            .push(value, now, horizon);
    }

    /// Aggregate under the current mode; `None` in `Normal` mode or for a key
    /// that has never been pushed.
    pub fn value(&self, key: SignalKey) -> Option<f64> {
        let state = self.signals[key.index()].as_ref()?;
        match self.mode {
            AggregationMode::Normal => None,
            AggregationMode::Avg => state.window_mean(),
            AggregationMode::Ema => Some(state.ema()),
        }
    }

    /// Value to display: the aggregate when there is one, otherwise `latest`.
    pub fn present(&self, key: SignalKey, latest: f64) -> f64 {
        match self.value(key) {
            Some(v) if v.is_finite() => v,
            _ => latest,
        }
    }

    pub fn state(&self, key: SignalKey) -> Option<&SignalState> {
        self.signals[key.index()].as_ref()
    }
}

impl Default for SignalAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::AngleHelper;

    fn secs(v: f64) -> Duration {
        Duration::from_secs_f64(v)
    }

    #[test]
    fn avg_of_three_scalars() {
        let mut agg = SignalAggregator::default();
        agg.push(SignalKey::VehSpd, 10.0, secs(0.0));
        agg.push(SignalKey::VehSpd, 20.0, secs(1.0));
        agg.push(SignalKey::VehSpd, 30.0, secs(2.0));
        agg.set_mode(AggregationMode::Avg);
        assert_eq!(agg.value(SignalKey::VehSpd), Some(20.0));
    }

    #[test]
    fn normal_mode_and_unknown_keys_yield_none() {
        let mut agg = SignalAggregator::default();
        agg.push(SignalKey::Temp, 21.0, secs(0.0));
        assert_eq!(agg.value(SignalKey::Temp), None);
        agg.set_mode(AggregationMode::Ema);
        assert_eq!(agg.value(SignalKey::Wind), None);
        assert_eq!(agg.present(SignalKey::Wind, 4.5), 4.5);
    }

    #[test]
    fn non_finite_pushes_are_ignored() {
        let mut agg = SignalAggregator::default();
        agg.push(SignalKey::Wind, f64::NAN, secs(0.0));
        agg.push(SignalKey::Wind, f64::INFINITY, secs(0.5));
        assert!(agg.state(SignalKey::Wind).is_none());
    }

    #[test]
    fn mode_switch_reads_existing_history() {
        let mut agg = SignalAggregator::default();
        agg.push(SignalKey::VehHdg, 359.0, secs(0.0));
        agg.push(SignalKey::VehHdg, 1.0, secs(1.0));
        assert_eq!(agg.present(SignalKey::VehHdg, 1.0), 1.0);

        agg.set_mode(AggregationMode::Avg);
        let avg = agg.present(SignalKey::VehHdg, 1.0);
        assert!(AngleHelper::shortest_delta(avg, 0.0).abs() < 1e-6);
    }

    #[test]
    fn ema_is_seeded_with_first_value() {
        let mut agg = SignalAggregator::default();
        agg.set_mode(AggregationMode::Ema);
        agg.push(SignalKey::Temp, 18.0, secs(3.0));
        assert_eq!(agg.value(SignalKey::Temp), Some(18.0));
    }

    #[test]
    fn cycle_and_labels() {
        assert_eq!(AggregationMode::Normal.next(), AggregationMode::Avg);
        assert_eq!(AggregationMode::Avg.next(), AggregationMode::Ema);
        assert_eq!(AggregationMode::Ema.next(), AggregationMode::Normal);
        assert_eq!(AggregationMode::Avg.label(DEFAULT_HORIZON), "Avg (10s)");
        assert_eq!(AggregationMode::Ema.label(DEFAULT_HORIZON), "EMA (10s)");
    }
}
