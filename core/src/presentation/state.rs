use crate::math::GeoPoint;
use crate::render::Channel;
use std::collections::BTreeMap;

/// What each output channel currently shows. Tweens restart from here.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    values: BTreeMap<Channel, f64>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> Option<f64> {
        self.values.get(&channel).copied()
    }

    pub fn set(&mut self, channel: Channel, value: f64) {
        self.values.insert(channel, value);
    }

    /// Where a new tween on `channel` starts. Texts and map markers that have
    /// never been written return `None` and snap to their first value; dials
    /// and bars rest at zero.
    pub fn tween_origin(&self, channel: Channel) -> Option<f64> {
        match (self.get(channel), channel) {
            (Some(v), _) if v.is_finite() => Some(v),
            (_, Channel::Text(_) | Channel::MarkerLat(_) | Channel::MarkerLon(_)) => None,
            _ => Some(0.0),
        }
    }
}

/// Last raw (unconverted, unaggregated) reading of one tracked entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackReadings {
    pub spd_mps: Option<f64>,
    pub hdg_deg: Option<f64>,
    pub alt_m: Option<f64>,
    pub position: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherReadings {
    pub temp_c: Option<f64>,
    pub wind_mps: Option<f64>,
    pub wind_dir_deg: Option<f64>,
}

/// Raw inputs kept so every output can be recomputed after a unit or
/// aggregation change.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastKnown {
    pub vehicle: TrackReadings,
    pub ac2: TrackReadings,
    pub weather: WeatherReadings,
}
