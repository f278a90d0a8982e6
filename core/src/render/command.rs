use crate::math::GeoPoint;
use crate::render::format::NumberFormat;
use crate::units::{GaugeReading, GaugeScale, SpeedUnit, UnitSelection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextOutput {
    VehSpeed,
    VehHeading,
    VehAlt,
    VehLat,
    VehLon,
    Temp,
    Wind,
    WindDir,
    Ac2Speed,
    Ac2Heading,
    Ac2Alt,
    Ac2Lat,
    Ac2Lon,
}

impl TextOutput {
    pub const ALL: [TextOutput; 13] = [
        TextOutput::VehSpeed,
        TextOutput::VehHeading,
        TextOutput::VehAlt,
        TextOutput::VehLat,
        TextOutput::VehLon,
        TextOutput::Temp,
        TextOutput::Wind,
        TextOutput::WindDir,
        TextOutput::Ac2Speed,
        TextOutput::Ac2Heading,
        TextOutput::Ac2Alt,
        TextOutput::Ac2Lat,
        TextOutput::Ac2Lon,
    ];

    pub fn number_format(self) -> NumberFormat {
        match self {
            TextOutput::VehHeading | TextOutput::WindDir | TextOutput::Ac2Heading => {
                NumberFormat::Degrees
            }
            TextOutput::VehLat | TextOutput::VehLon | TextOutput::Ac2Lat | TextOutput::Ac2Lon => {
                NumberFormat::Coordinate
            }
            _ => NumberFormat::Integer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GaugeOutput {
    Vehicle,
    Ac2,
    Wind,
}

impl GaugeOutput {
    pub const ALL: [GaugeOutput; 3] = [GaugeOutput::Vehicle, GaugeOutput::Ac2, GaugeOutput::Wind];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompassOutput {
    Vehicle,
    Ac2,
    Wind,
}

/// A tracked entity with a map marker, trail and altitude bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Track {
    Vehicle,
    Ac2,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Vehicle, Track::Ac2];
}

/// A visual sink the host may or may not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutputId {
    Text(TextOutput),
    Gauge(GaugeOutput),
    Compass(CompassOutput),
    Marker(Track),
    Trail(Track),
    AltBar(Track),
    UnitLabels,
    Map,
}

/// One animatable scalar. Tweens are keyed by channel, so a new target on a
/// channel always replaces the tween already driving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    Text(TextOutput),
    Gauge(GaugeOutput),
    Compass(CompassOutput),
    MarkerLat(Track),
    MarkerLon(Track),
    MarkerHeading(Track),
    AltBar(Track),
}

impl Channel {
    pub fn output(self) -> OutputId {
        match self {
            Channel::Text(t) => OutputId::Text(t),
            Channel::Gauge(g) => OutputId::Gauge(g),
            Channel::Compass(c) => OutputId::Compass(c),
            Channel::MarkerLat(t) | Channel::MarkerLon(t) | Channel::MarkerHeading(t) => {
                OutputId::Marker(t)
            }
            Channel::AltBar(t) => OutputId::AltBar(t),
        }
    }

    /// Channels that tween round the circle instead of along the number line.
    pub fn is_angular(self) -> bool {
        matches!(
            self,
            Channel::Compass(_)
                | Channel::MarkerHeading(_)
                | Channel::Text(TextOutput::VehHeading)
                | Channel::Text(TextOutput::WindDir)
                | Channel::Text(TextOutput::Ac2Heading)
        )
    }
}

/// "Set output O to V": everything the core asks of a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    Text {
        output: TextOutput,
        value: f64,
        text: String,
    },
    Gauge {
        gauge: GaugeOutput,
        value: f64,
        reading: GaugeReading,
    },
    /// The gauge's bands changed; its needle restarts from zero.
    GaugeScale {
        gauge: GaugeOutput,
        unit: SpeedUnit,
        scale: GaugeScale,
    },
    Compass {
        compass: CompassOutput,
        angle_deg: f64,
    },
    MarkerPosition {
        track: Track,
        point: GeoPoint,
    },
    MarkerHeading {
        track: Track,
        heading_deg: f64,
    },
    /// Fill in `0..=1` of the altitude bar.
    AltBar {
        track: Track,
        fraction: f64,
    },
    AltBarLabel {
        track: Track,
        text: String,
    },
    /// Appends a point; the renderer keeps at most `limit` points.
    TrailPoint {
        track: Track,
        point: GeoPoint,
        limit: usize,
    },
    UnitLabels {
        units: UnitSelection,
    },
    FitBounds {
        a: GeoPoint,
        b: GeoPoint,
    },
}

impl RenderCommand {
    pub fn output(&self) -> OutputId {
        match self {
            RenderCommand::Text { output, .. } => OutputId::Text(*output),
            RenderCommand::Gauge { gauge, .. } | RenderCommand::GaugeScale { gauge, .. } => {
                OutputId::Gauge(*gauge)
            }
            RenderCommand::Compass { compass, .. } => OutputId::Compass(*compass),
            RenderCommand::MarkerPosition { track, .. }
            | RenderCommand::MarkerHeading { track, .. } => OutputId::Marker(*track),
            RenderCommand::AltBar { track, .. } | RenderCommand::AltBarLabel { track, .. } => {
                OutputId::AltBar(*track)
            }
            RenderCommand::TrailPoint { track, .. } => OutputId::Trail(*track),
            RenderCommand::UnitLabels { .. } => OutputId::UnitLabels,
            RenderCommand::FitBounds { .. } => OutputId::Map,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RenderCommand::Text { .. } => "text",
            RenderCommand::Gauge { .. } => "gauge",
            RenderCommand::GaugeScale { .. } => "gauge_scale",
            RenderCommand::Compass { .. } => "compass",
            RenderCommand::MarkerPosition { .. } => "marker_position",
            RenderCommand::MarkerHeading { .. } => "marker_heading",
            RenderCommand::AltBar { .. } => "alt_bar",
            RenderCommand::AltBarLabel { .. } => "alt_bar_label",
            RenderCommand::TrailPoint { .. } => "trail_point",
            RenderCommand::UnitLabels { .. } => "unit_labels",
            RenderCommand::FitBounds { .. } => "fit_bounds",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_channels_share_one_output() {
        assert_eq!(Channel::MarkerLat(Track::Ac2).output(), OutputId::Marker(Track::Ac2));
        assert_eq!(
            Channel::MarkerHeading(Track::Ac2).output(),
            OutputId::Marker(Track::Ac2)
        );
    }

    #[test]
    fn only_direction_channels_are_angular() {
        assert!(Channel::Compass(CompassOutput::Wind).is_angular());
        assert!(Channel::MarkerHeading(Track::Vehicle).is_angular());
        assert!(Channel::Text(TextOutput::VehHeading).is_angular());
        assert!(!Channel::Text(TextOutput::VehSpeed).is_angular());
        assert!(!Channel::Gauge(GaugeOutput::Wind).is_angular());
    }

    #[test]
    fn coordinate_texts_use_four_decimals() {
        assert_eq!(TextOutput::Ac2Lat.number_format(), NumberFormat::Coordinate);
        assert_eq!(TextOutput::WindDir.number_format(), NumberFormat::Degrees);
        assert_eq!(TextOutput::Temp.number_format(), NumberFormat::Integer);
    }
}
