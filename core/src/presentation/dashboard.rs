use crate::aggregation::{AggregationMode, SignalKey};
use crate::animation::{AnimMode, Clock, TweenScheduler};
use crate::diagnostics::{LogManager, MetricsRecorder, MetricsSnapshot};
use crate::feed::{PositionReport, TelemetrySample, WeatherReport};
use crate::math::{GeoHelper, GeoPoint, StatsHelper};
use crate::prelude::{DashboardConfig, DashboardResult};
use crate::presentation::session::Session;
use crate::presentation::state::{DisplayState, LastKnown, TrackReadings};
use crate::render::{
    Channel, CompassOutput, GaugeOutput, NumberFormat, OutputId, RenderCommand, Renderer,
    TextOutput, Track,
};
use crate::units::{GaugeScale, UnitSelection};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Second-entity fixes closer together than this never yield a speed.
const MIN_FIX_GAP_SECS: f64 = 0.05;

/// Signals and outputs fed by one tracked entity.
struct TrackOutputs {
    track: Track,
    speed: (SignalKey, TextOutput, GaugeOutput),
    heading: (SignalKey, TextOutput, CompassOutput),
    alt: TextOutput,
    lat: (SignalKey, TextOutput),
    lon: (SignalKey, TextOutput),
}

const VEHICLE: TrackOutputs = TrackOutputs {
    track: Track::Vehicle,
    speed: (SignalKey::VehSpd, TextOutput::VehSpeed, GaugeOutput::Vehicle),
    heading: (SignalKey::VehHdg, TextOutput::VehHeading, CompassOutput::Vehicle),
    alt: TextOutput::VehAlt,
    lat: (SignalKey::VehLat, TextOutput::VehLat),
    lon: (SignalKey::VehLon, TextOutput::VehLon),
};

const AC2: TrackOutputs = TrackOutputs {
    track: Track::Ac2,
    speed: (SignalKey::Ac2Spd, TextOutput::Ac2Speed, GaugeOutput::Ac2),
    heading: (SignalKey::Ac2Hdg, TextOutput::Ac2Heading, CompassOutput::Ac2),
    alt: TextOutput::Ac2Alt,
    lat: (SignalKey::Ac2Lat, TextOutput::Ac2Lat),
    lon: (SignalKey::Ac2Lon, TextOutput::Ac2Lon),
};

#[derive(Debug, Clone, Copy)]
struct Fix {
    point: GeoPoint,
    at: DateTime<Utc>,
}

/// Read-only summary for a status line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStatus {
    pub aggregation: AggregationMode,
    pub aggregation_label: String,
    pub animation: AnimMode,
    pub units: UnitSelection,
    pub rate_hz: Option<f64>,
    pub active_tweens: usize,
    pub metrics: MetricsSnapshot,
}

impl DashboardStatus {
    pub fn summary_line(&self) -> String {
        let rate = self
            .rate_hz
            .map(|hz| format!(" • ~{hz:.1} Hz"))
            .unwrap_or_default();
        format!(
            "Agg: {} • Anim: {} • {} / {} / {}{}",
            self.aggregation_label,
            self.animation.label(),
            self.units.speed.label(),
            self.units.temp.label(),
            self.units.alt.label(),
            rate
        )
    }
}

/// Turns telemetry samples into animated render commands.
///
/// The host calls [`ingest`](Self::ingest) or [`push`](Self::push) when a
/// message arrives and [`tick`](Self::tick) once per animation frame. Both run
/// on the same thread, so no locking is involved.
pub struct Dashboard<R: Renderer, C: Clock> {
    config: DashboardConfig,
    session: Session,
    scheduler: TweenScheduler<Channel>,
    display: DisplayState,
    last: LastKnown,
    last_ac2_fix: Option<Fix>,
    did_fit: bool,
    frame: Vec<(Channel, f64)>,
    renderer: R,
    clock: C,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl<R: Renderer, C: Clock> Dashboard<R, C> {
    /// Validates `config` and draws the initial gauge scales and labels.
    pub fn new(config: DashboardConfig, renderer: R, clock: C) -> DashboardResult<Self> {
        config.validate()?;
        let mut dashboard = Self {
            session: Session::from_config(&config),
            config,
            scheduler: TweenScheduler::new(),
            display: DisplayState::new(),
            last: LastKnown::default(),
            last_ac2_fix: None,
            did_fit: false,
            frame: Vec::new(),
            renderer,
            clock,
            logger: LogManager::new("dashboard"),
            metrics: MetricsRecorder::new(),
        };
        dashboard.rebuild_gauges();
        dashboard.relabel_units();
        Ok(dashboard)
    }

    /// Decodes and applies one raw payload. A malformed payload is logged and
    /// dropped without touching any state; the error is handed back for
    /// callers that want it.
    pub fn ingest(&mut self, payload: &[u8]) -> DashboardResult<()> {
        match TelemetrySample::decode(payload) {
            Ok(sample) => {
                self.push(&sample);
                Ok(())
            }
            Err(err) => {
                self.metrics.record_rejected();
                self.logger.warn(&format!("bad payload dropped: {err}"));
                Err(err)
            }
        }
    }

    /// Applies one decoded sample. Absent fields are skipped one by one.
    pub fn push(&mut self, sample: &TelemetrySample) {
        let now = self.clock.now();
        self.session
            .cadence
            .record_arrival(now, sample.meta.rate_hz);

        self.apply_track(&VEHICLE, &sample.vehicle.pos, sample.vehicle.pos.spd_mps, now);
        self.apply_weather(&sample.vehicle.weather, now);
        let ac2_speed = self.ac2_speed(&sample.ac2.pos);
        self.apply_track(&AC2, &sample.ac2.pos, ac2_speed, now);

        self.maybe_fit();
        self.metrics.record_processed();
    }

    /// Steps every running animation to the current time.
    /// Returns how many values were written this frame.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mode = self.session.animation;
        let mut frame = std::mem::take(&mut self.frame);
        self.scheduler
            .advance(now, mode, |channel, value| frame.push((channel, value)));
        let written = frame.len();
        for (channel, value) in frame.drain(..) {
            self.dispatch(channel, value);
        }
        self.frame = frame;
        written
    }

    /// Re-issues every output from the last raw readings under the current
    /// units and aggregation mode.
    pub fn repaint_all(&mut self) {
        let now = self.clock.now();
        let last = self.last;

        for (outputs, readings) in [(&VEHICLE, last.vehicle), (&AC2, last.ac2)] {
            if let Some(spd) = readings.spd_mps {
                self.show_speed(outputs.speed, spd, now);
            }
        }
        if let Some(wind) = last.weather.wind_mps {
            self.show_speed((SignalKey::Wind, TextOutput::Wind, GaugeOutput::Wind), wind, now);
        }
        if let Some(temp) = last.weather.temp_c {
            self.show_temp(temp, now);
        }

        for (outputs, readings) in [(&VEHICLE, last.vehicle), (&AC2, last.ac2)] {
            if let Some(hdg) = readings.hdg_deg {
                self.show_heading(outputs, hdg, now);
            }
        }
        if let Some(dir) = last.weather.wind_dir_deg {
            self.show_wind_dir(dir, now);
        }

        for (outputs, readings) in [(&VEHICLE, last.vehicle), (&AC2, last.ac2)] {
            if let Some(alt) = readings.alt_m {
                let shown = self.session.units.alt.from_meters(alt);
                self.animate(Channel::Text(outputs.alt), shown, now);
            }
        }
        self.relabel_alt_bars();

        for (outputs, readings) in [(&VEHICLE, last.vehicle), (&AC2, last.ac2)] {
            if let Some(point) = readings.position {
                self.show_coordinates(outputs, point, now);
            }
        }
    }

    pub fn set_aggregation_mode(&mut self, mode: AggregationMode) {
        self.session.aggregator.set_mode(mode);
        self.logger.record(&format!(
            "aggregation -> {}",
            mode.label(self.session.aggregator.horizon())
        ));
        self.repaint_all();
    }

    pub fn cycle_aggregation_mode(&mut self) -> AggregationMode {
        let next = self.session.aggregator.mode().next();
        self.set_aggregation_mode(next);
        next
    }

    /// Affects tweens started from now on.
    pub fn set_anim_mode(&mut self, mode: AnimMode) {
        self.session.animation = mode;
        self.logger.record(&format!("animation -> {}", mode.label()));
    }

    pub fn cycle_anim_mode(&mut self) -> AnimMode {
        let next = self.session.animation.next();
        self.set_anim_mode(next);
        next
    }

    pub fn set_units(&mut self, units: UnitSelection) {
        let speed_changed = units.speed != self.session.units.speed;
        self.session.units = units;
        self.logger.record(&format!(
            "units -> {} / {} / {}",
            units.speed.label(),
            units.temp.label(),
            units.alt.label()
        ));
        if speed_changed {
            self.rebuild_gauges();
        }
        self.relabel_units();
        self.repaint_all();
    }

    pub fn cycle_speed_unit(&mut self) -> UnitSelection {
        let mut units = self.session.units;
        units.speed = units.speed.next();
        self.set_units(units);
        units
    }

    pub fn cycle_temp_unit(&mut self) -> UnitSelection {
        let mut units = self.session.units;
        units.temp = units.temp.next();
        self.set_units(units);
        units
    }

    pub fn cycle_alt_unit(&mut self) -> UnitSelection {
        let mut units = self.session.units;
        units.alt = units.alt.next();
        self.set_units(units);
        units
    }

    pub fn status(&self) -> DashboardStatus {
        let aggregator = &self.session.aggregator;
        DashboardStatus {
            aggregation: aggregator.mode(),
            aggregation_label: aggregator.mode().label(aggregator.horizon()),
            animation: self.session.animation,
            units: self.session.units,
            rate_hz: self.session.cadence.rate_hz(),
            active_tweens: self.scheduler.len(),
            metrics: self.metrics.snapshot(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Value currently shown on `channel`, if it was ever written.
    pub fn displayed(&self, channel: Channel) -> Option<f64> {
        self.display.get(channel)
    }

    pub fn gauge_scale(&self) -> GaugeScale {
        GaugeScale::for_unit(self.session.units.speed)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn apply_track(
        &mut self,
        outputs: &TrackOutputs,
        pos: &PositionReport,
        speed: Option<f64>,
        now: Duration,
    ) {
        if let Some(spd) = speed {
            self.readings_mut(outputs.track).spd_mps = Some(spd);
            self.session.aggregator.push(outputs.speed.0, spd, now);
            self.show_speed(outputs.speed, spd, now);
        }

        if let Some(hdg) = pos.hdg_deg {
            self.readings_mut(outputs.track).hdg_deg = Some(hdg);
            self.session.aggregator.push(outputs.heading.0, hdg, now);
            self.show_heading(outputs, hdg, now);
        }

        if let Some(alt) = pos.alt_m {
            self.readings_mut(outputs.track).alt_m = Some(alt);
            let shown = self.session.units.alt.from_meters(alt);
            self.animate(Channel::Text(outputs.alt), shown, now);
            let fraction = StatsHelper::clamp(alt / self.config.altitude_bar_max_m, 0.0, 1.0);
            self.animate(Channel::AltBar(outputs.track), fraction, now);
        }

        if let Some(point) = pos.point() {
            self.readings_mut(outputs.track).position = Some(point);
            self.session.aggregator.push(outputs.lat.0, point.lat, now);
            self.session.aggregator.push(outputs.lon.0, point.lon, now);
            self.show_coordinates(outputs, point, now);

            // the map follows the raw fix, only the text is aggregated
            if self.renderer.has_output(OutputId::Marker(outputs.track)) {
                self.animate(Channel::MarkerLat(outputs.track), point.lat, now);
                self.animate(Channel::MarkerLon(outputs.track), point.lon, now);
            }
            if self.renderer.has_output(OutputId::Trail(outputs.track)) {
                self.renderer.render(RenderCommand::TrailPoint {
                    track: outputs.track,
                    point,
                    limit: self.config.trail_limit,
                });
            }
        }
    }

    fn apply_weather(&mut self, weather: &WeatherReport, now: Duration) {
        if let Some(temp) = weather.temp_c {
            self.last.weather.temp_c = Some(temp);
            self.session.aggregator.push(SignalKey::Temp, temp, now);
            self.show_temp(temp, now);
        }
        if let Some(wind) = weather.wind_mps {
            self.last.weather.wind_mps = Some(wind);
            self.session.aggregator.push(SignalKey::Wind, wind, now);
            self.show_speed((SignalKey::Wind, TextOutput::Wind, GaugeOutput::Wind), wind, now);
        }
        if let Some(dir) = weather.wind_dir_deg {
            self.last.weather.wind_dir_deg = Some(dir);
            self.session.aggregator.push(SignalKey::WindDir, dir, now);
            self.show_wind_dir(dir, now);
        }
    }

    /// Reported speed, or distance over time since the previous timestamped
    /// fix when the feed reports none (or a non-positive one).
    fn ac2_speed(&mut self, pos: &PositionReport) -> Option<f64> {
        let mut speed = pos.spd_mps;
        let point = pos.point();

        if !speed.is_some_and(|s| s > 0.0) {
            if let (Some(ts), Some(point), Some(prev)) = (pos.ts, point, self.last_ac2_fix) {
                let dt = (ts - prev.at)
                    .num_microseconds()
                    .map(|us| us as f64 / 1e6)
                    .unwrap_or(0.0);
                if dt > MIN_FIX_GAP_SECS {
                    let derived = GeoHelper::haversine_m(prev.point, point) / dt;
                    self.logger
                        .detail(&format!("ac2 speed derived: {derived:.2} m/s over {dt:.2}s"));
                    self.metrics.record_derived_speed();
                    speed = Some(derived);
                }
            }
        }

        if let (Some(at), Some(point)) = (pos.ts, point) {
            self.last_ac2_fix = Some(Fix { point, at });
        }
        speed
    }

    fn show_speed(
        &mut self,
        (key, text, gauge): (SignalKey, TextOutput, GaugeOutput),
        raw_mps: f64,
        now: Duration,
    ) {
        let shown = self.session.aggregator.present(key, raw_mps);
        let converted = self.session.units.speed.from_mps(shown);
        self.animate(Channel::Text(text), converted, now);
        self.animate(Channel::Gauge(gauge), converted, now);
    }

    fn show_temp(&mut self, raw_c: f64, now: Duration) {
        let shown = self.session.aggregator.present(SignalKey::Temp, raw_c);
        let converted = self.session.units.temp.from_celsius(shown);
        self.animate(Channel::Text(TextOutput::Temp), converted, now);
    }

    fn show_heading(&mut self, outputs: &TrackOutputs, raw_deg: f64, now: Duration) {
        let (key, text, compass) = outputs.heading;
        let shown = self.session.aggregator.present(key, raw_deg);
        self.animate(Channel::Text(text), shown, now);
        self.animate(Channel::Compass(compass), shown, now);
        self.animate(Channel::MarkerHeading(outputs.track), shown, now);
    }

    fn show_wind_dir(&mut self, raw_deg: f64, now: Duration) {
        let shown = self.session.aggregator.present(SignalKey::WindDir, raw_deg);
        self.animate(Channel::Text(TextOutput::WindDir), shown, now);
        self.animate(Channel::Compass(CompassOutput::Wind), shown, now);
    }

    fn show_coordinates(&mut self, outputs: &TrackOutputs, point: GeoPoint, now: Duration) {
        let lat = self.session.aggregator.present(outputs.lat.0, point.lat);
        let lon = self.session.aggregator.present(outputs.lon.0, point.lon);
        self.animate(Channel::Text(outputs.lat.1), lat, now);
        self.animate(Channel::Text(outputs.lon.1), lon, now);
    }

    /// Points `channel` at `target`, tweening from what it shows now.
    fn animate(&mut self, channel: Channel, target: f64, now: Duration) {
        if !target.is_finite() || !self.renderer.has_output(channel.output()) {
            return;
        }
        let Some(from) = self.display.tween_origin(channel) else {
            self.scheduler.cancel(channel);
            self.dispatch(channel, target);
            return;
        };
        let mode = self.session.animation;
        let duration = self.session.cadence.anim_duration(mode);
        let first = if channel.is_angular() {
            self.scheduler
                .start_angle_tween(channel, from, target, duration, mode, now)
        } else {
            self.scheduler
                .start_tween(channel, from, target, duration, mode, now)
        };
        self.dispatch(channel, first);
    }

    /// Records `value` as displayed on `channel` and renders it.
    fn dispatch(&mut self, channel: Channel, value: f64) {
        self.display.set(channel, value);
        if !self.renderer.has_output(channel.output()) {
            return;
        }
        let command = match channel {
            Channel::Text(output) => RenderCommand::Text {
                output,
                value,
                text: output.number_format().format(value),
            },
            Channel::Gauge(gauge) => RenderCommand::Gauge {
                gauge,
                value,
                reading: self.gauge_scale().reading(value),
            },
            Channel::Compass(compass) => RenderCommand::Compass {
                compass,
                angle_deg: value,
            },
            Channel::MarkerLat(track) => match self.display.get(Channel::MarkerLon(track)) {
                Some(lon) => RenderCommand::MarkerPosition {
                    track,
                    point: GeoPoint::new(value, lon),
                },
                None => return,
            },
            Channel::MarkerLon(track) => match self.display.get(Channel::MarkerLat(track)) {
                Some(lat) => RenderCommand::MarkerPosition {
                    track,
                    point: GeoPoint::new(lat, value),
                },
                None => return,
            },
            Channel::MarkerHeading(track) => RenderCommand::MarkerHeading {
                track,
                heading_deg: value,
            },
            Channel::AltBar(track) => RenderCommand::AltBar {
                track,
                fraction: value,
            },
        };
        self.renderer.render(command);
    }

    /// Re-derives gauge bands for the active speed unit. Needles drop back
    /// to zero and any running gauge tween is abandoned.
    fn rebuild_gauges(&mut self) {
        let unit = self.session.units.speed;
        let scale = GaugeScale::for_unit(unit);
        for gauge in GaugeOutput::ALL {
            let channel = Channel::Gauge(gauge);
            self.scheduler.cancel(channel);
            self.display.set(channel, 0.0);
            if self.renderer.has_output(OutputId::Gauge(gauge)) {
                self.renderer
                    .render(RenderCommand::GaugeScale { gauge, unit, scale });
            }
        }
    }

    fn relabel_units(&mut self) {
        if self.renderer.has_output(OutputId::UnitLabels) {
            self.renderer.render(RenderCommand::UnitLabels {
                units: self.session.units,
            });
        }
        self.relabel_alt_bars();
    }

    fn relabel_alt_bars(&mut self) {
        let alt = self.session.units.alt;
        let top = alt.from_meters(self.config.altitude_bar_max_m);
        let text = format!("{} {}", NumberFormat::Integer.format(top), alt.label());
        for track in Track::ALL {
            if self.renderer.has_output(OutputId::AltBar(track)) {
                self.renderer.render(RenderCommand::AltBarLabel {
                    track,
                    text: text.clone(),
                });
            }
        }
    }

    fn maybe_fit(&mut self) {
        if self.did_fit {
            return;
        }
        if let (Some(a), Some(b)) = (self.last.vehicle.position, self.last.ac2.position) {
            self.did_fit = true;
            if self.renderer.has_output(OutputId::Map) {
                self.renderer.render(RenderCommand::FitBounds { a, b });
            }
        }
    }

    fn readings_mut(&mut self, track: Track) -> &mut TrackReadings {
        match track {
            Track::Vehicle => &mut self.last.vehicle,
            Track::Ac2 => &mut self.last.ac2,
        }
    }
}
