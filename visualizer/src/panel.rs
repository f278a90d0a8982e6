use airchasecore::math::GeoPoint;
use airchasecore::render::{
    CompassOutput, GaugeOutput, RenderCommand, Renderer, TextOutput, Track, PLACEHOLDER,
};
use airchasecore::units::{GaugeReading, GaugeScale, SpeedUnit, UnitSelection};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Copy)]
pub struct GaugeState {
    pub value: f64,
    pub reading: Option<GaugeReading>,
    pub scale: GaugeScale,
    pub unit: SpeedUnit,
}

impl Default for GaugeState {
    fn default() -> Self {
        let unit = SpeedUnit::default();
        Self {
            value: 0.0,
            reading: None,
            scale: GaugeScale::for_unit(unit),
            unit,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerState {
    pub point: Option<GeoPoint>,
    pub heading_deg: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AltBarState {
    pub fraction: f64,
    pub label: String,
}

/// Holds the latest state of every panel widget. The view reads it back
/// each frame.
#[derive(Debug, Clone, Default)]
pub struct PanelRenderer {
    texts: BTreeMap<TextOutput, String>,
    gauges: BTreeMap<GaugeOutput, GaugeState>,
    compasses: BTreeMap<CompassOutput, f64>,
    markers: BTreeMap<Track, MarkerState>,
    trails: BTreeMap<Track, VecDeque<GeoPoint>>,
    alt_bars: BTreeMap<Track, AltBarState>,
    units: UnitSelection,
    bounds: Option<(GeoPoint, GeoPoint)>,
}

impl PanelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, output: TextOutput) -> &str {
        self.texts
            .get(&output)
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER)
    }

    pub fn gauge(&self, gauge: GaugeOutput) -> GaugeState {
        self.gauges.get(&gauge).copied().unwrap_or_default()
    }

    pub fn compass(&self, compass: CompassOutput) -> f64 {
        self.compasses.get(&compass).copied().unwrap_or(0.0)
    }

    pub fn marker(&self, track: Track) -> MarkerState {
        self.markers.get(&track).copied().unwrap_or_default()
    }

    pub fn trail(&self, track: Track) -> impl Iterator<Item = &GeoPoint> + '_ {
        self.trails.get(&track).into_iter().flatten()
    }

    pub fn alt_bar(&self, track: Track) -> AltBarState {
        self.alt_bars.get(&track).cloned().unwrap_or_default()
    }

    pub fn units(&self) -> UnitSelection {
        self.units
    }

    /// Map extent requested by the dashboard, if it has asked for one yet.
    pub fn bounds(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.bounds
    }
}

impl Renderer for PanelRenderer {
    fn render(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::Text { output, text, .. } => {
                self.texts.insert(output, text);
            }
            RenderCommand::Gauge {
                gauge,
                value,
                reading,
            } => {
                let state = self.gauges.entry(gauge).or_default();
                state.value = value;
                state.reading = Some(reading);
            }
            RenderCommand::GaugeScale { gauge, unit, scale } => {
                self.gauges.insert(
                    gauge,
                    GaugeState {
                        value: 0.0,
                        reading: Some(scale.reading(0.0)),
                        scale,
                        unit,
                    },
                );
            }
            RenderCommand::Compass { compass, angle_deg } => {
                self.compasses.insert(compass, angle_deg);
            }
            RenderCommand::MarkerPosition { track, point } => {
                self.markers.entry(track).or_default().point = Some(point);
            }
            RenderCommand::MarkerHeading { track, heading_deg } => {
                self.markers.entry(track).or_default().heading_deg = heading_deg;
            }
            RenderCommand::AltBar { track, fraction } => {
                self.alt_bars.entry(track).or_default().fraction = fraction;
            }
            RenderCommand::AltBarLabel { track, text } => {
                self.alt_bars.entry(track).or_default().label = text;
            }
            RenderCommand::TrailPoint {
                track,
                point,
                limit,
            } => {
                let trail = self.trails.entry(track).or_default();
                trail.push_back(point);
                while trail.len() > limit {
                    trail.pop_front();
                }
            }
            RenderCommand::UnitLabels { units } => {
                self.units = units;
            }
            RenderCommand::FitBounds { a, b } => {
                self.bounds = Some((a, b));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airchasecore::units::GaugeZone;

    #[test]
    fn unknown_texts_show_placeholder() {
        let panel = PanelRenderer::new();
        assert_eq!(panel.text(TextOutput::Temp), PLACEHOLDER);
    }

    #[test]
    fn trails_keep_the_newest_points() {
        let mut panel = PanelRenderer::new();
        for i in 0..5 {
            panel.render(RenderCommand::TrailPoint {
                track: Track::Ac2,
                point: GeoPoint::new(i as f64, 0.0),
                limit: 3,
            });
        }
        let lats: Vec<f64> = panel.trail(Track::Ac2).map(|p| p.lat).collect();
        assert_eq!(lats, vec![2.0, 3.0, 4.0]);
        assert_eq!(panel.trail(Track::Vehicle).count(), 0);
    }

    #[test]
    fn gauge_scale_resets_the_needle() {
        let mut panel = PanelRenderer::new();
        let scale = GaugeScale::for_unit(SpeedUnit::Knots);
        panel.render(RenderCommand::Gauge {
            gauge: GaugeOutput::Wind,
            value: 120.0,
            reading: scale.reading(120.0),
        });
        assert_eq!(panel.gauge(GaugeOutput::Wind).reading.unwrap().zone, GaugeZone::Red);

        let unit = SpeedUnit::MilesPerHour;
        panel.render(RenderCommand::GaugeScale {
            gauge: GaugeOutput::Wind,
            unit,
            scale: GaugeScale::for_unit(unit),
        });
        let state = panel.gauge(GaugeOutput::Wind);
        assert_eq!(state.value, 0.0);
        assert_eq!(state.unit, unit);
        assert_eq!(state.reading.unwrap().fraction, 0.0);
    }

    #[test]
    fn marker_position_and_heading_merge() {
        let mut panel = PanelRenderer::new();
        panel.render(RenderCommand::MarkerHeading {
            track: Track::Vehicle,
            heading_deg: 45.0,
        });
        panel.render(RenderCommand::MarkerPosition {
            track: Track::Vehicle,
            point: GeoPoint::new(51.66, -2.06),
        });
        let marker = panel.marker(Track::Vehicle);
        assert_eq!(marker.heading_deg, 45.0);
        assert_eq!(marker.point, Some(GeoPoint::new(51.66, -2.06)));
    }
}
