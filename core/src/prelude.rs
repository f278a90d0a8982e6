use crate::aggregation::{AggregationMode, DEFAULT_HORIZON};
use crate::animation::AnimMode;
use crate::units::UnitSelection;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Initial session settings for a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Averaging window and EMA time constant, in seconds.
    pub horizon_secs: f64,
    pub animation: AnimMode,
    pub aggregation: AggregationMode,
    pub units: UnitSelection,
    /// Points kept per map trail.
    pub trail_limit: usize,
    /// Altitude shown as a full bar, in meters.
    pub altitude_bar_max_m: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            horizon_secs: DEFAULT_HORIZON.as_secs_f64(),
            animation: AnimMode::Soft,
            aggregation: AggregationMode::Normal,
            units: UnitSelection::default(),
            trail_limit: 10_000,
            altitude_bar_max_m: 1000.0,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if self.checked_horizon().is_none() {
            return Err(DashboardError::InvalidConfig(format!(
                "horizon_secs must be a positive, representable duration, got {}",
                self.horizon_secs
            )));
        }
        if !(self.altitude_bar_max_m.is_finite() && self.altitude_bar_max_m > 0.0) {
            return Err(DashboardError::InvalidConfig(format!(
                "altitude_bar_max_m must be positive, got {}",
                self.altitude_bar_max_m
            )));
        }
        if self.trail_limit == 0 {
            return Err(DashboardError::InvalidConfig(
                "trail_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Averaging horizon. Out-of-range values (rejected by
    /// [`validate`](Self::validate)) fall back to the default horizon.
    pub fn horizon(&self) -> Duration {
        self.checked_horizon().unwrap_or(DEFAULT_HORIZON)
    }

    fn checked_horizon(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.horizon_secs)
            .ok()
            .filter(|horizon| !horizon.is_zero())
    }
}

/// Common error type for the dashboard core.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DashboardConfig::default();
        config.validate().unwrap();
        assert_eq!(config.horizon(), Duration::from_secs(10));
    }

    #[test]
    fn rejects_non_positive_horizon() {
        let config = DashboardConfig {
            horizon_secs: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DashboardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_horizon_too_large_for_a_duration() {
        for horizon_secs in [1e20, f64::INFINITY, f64::NAN] {
            let config = DashboardConfig {
                horizon_secs,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(DashboardError::InvalidConfig(_))
            ));
            assert_eq!(config.horizon(), Duration::from_secs(10));
        }
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"animation": "snappy", "units": {"speed": "km/h"}}"#)
                .unwrap();
        assert_eq!(config.animation, AnimMode::Snappy);
        assert_eq!(config.units.speed, crate::units::SpeedUnit::KilometersPerHour);
        assert_eq!(config.trail_limit, 10_000);
    }
}
