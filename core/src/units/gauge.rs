use crate::math::StatsHelper;
use crate::units::convert::SpeedUnit;
use serde::{Deserialize, Serialize};

/// Gauge bands are defined in knots so they mean the same thing in any unit.
pub const GAUGE_MAX_KTS: f64 = 140.0;
pub const GAUGE_AMBER_KTS: f64 = 60.0;
pub const GAUGE_RED_KTS: f64 = 100.0;

/// Needle sweep: from 270° (left) through 360° to 450° (right).
pub const GAUGE_START_DEG: f64 = 270.0;
pub const GAUGE_SPAN_DEG: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeZone {
    Green,
    Amber,
    Red,
}

/// Gauge thresholds expressed in the active speed unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeScale {
    pub max: f64,
    pub amber: f64,
    pub red: f64,
}

/// Where the needle and fill sit for one value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeReading {
    pub fraction: f64,
    pub needle_deg: f64,
    pub zone: GaugeZone,
}

impl GaugeScale {
    pub fn for_unit(unit: SpeedUnit) -> Self {
        Self {
            max: unit.from_knots(GAUGE_MAX_KTS).round(),
            amber: unit.from_knots(GAUGE_AMBER_KTS).round(),
            red: unit.from_knots(GAUGE_RED_KTS).round(),
        }
    }

    pub fn reading(&self, value: f64) -> GaugeReading {
        let v = if value.is_finite() { value } else { 0.0 };
        let k = StatsHelper::clamp(v, 0.0, self.max);
        let fraction = if self.max > 0.0 { k / self.max } else { 0.0 };
        let zone = if k >= self.red {
            GaugeZone::Red
        } else if k >= self.amber {
            GaugeZone::Amber
        } else {
            GaugeZone::Green
        };
        GaugeReading {
            fraction,
            needle_deg: GAUGE_START_DEG + fraction * GAUGE_SPAN_DEG,
            zone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knots_scale_is_identity() {
        let scale = GaugeScale::for_unit(SpeedUnit::Knots);
        assert_eq!(scale.max, 140.0);
        assert_eq!(scale.amber, 60.0);
        assert_eq!(scale.red, 100.0);
    }

    #[test]
    fn kmh_scale_is_rederived_and_rounded() {
        let scale = GaugeScale::for_unit(SpeedUnit::KilometersPerHour);
        assert_eq!(scale.max, 259.0);
        assert_eq!(scale.amber, 111.0);
        assert_eq!(scale.red, 185.0);
    }

    #[test]
    fn reading_zones_and_needle() {
        let scale = GaugeScale::for_unit(SpeedUnit::Knots);
        let idle = scale.reading(0.0);
        assert_eq!(idle.zone, GaugeZone::Green);
        assert_eq!(idle.needle_deg, 270.0);

        let half = scale.reading(70.0);
        assert_eq!(half.zone, GaugeZone::Amber);
        assert!((half.needle_deg - 360.0).abs() < 1e-9);

        let pegged = scale.reading(500.0);
        assert_eq!(pegged.zone, GaugeZone::Red);
        assert_eq!(pegged.fraction, 1.0);
        assert_eq!(pegged.needle_deg, 450.0);
    }

    #[test]
    fn non_finite_reads_as_zero() {
        let scale = GaugeScale::for_unit(SpeedUnit::Knots);
        assert_eq!(scale.reading(f64::NAN).fraction, 0.0);
    }
}
