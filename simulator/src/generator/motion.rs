use airchasecore::feed::{
    FeedMeta, PositionReport, TelemetrySample, TrackedSection, VehicleSection, WeatherReport,
};
use airchasecore::math::geo::EARTH_RADIUS_M;
use airchasecore::math::{AngleHelper, GeoPoint, StatsHelper};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Settings for one synthetic chase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub vehicle_id: String,
    pub rate_hz: f64,
    pub weather_rate_hz: f64,
    pub start: GeoPoint,
    pub seed: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            vehicle_id: "pace_vehicle".into(),
            rate_hz: 10.0,
            weather_rate_hz: 2.0,
            start: GeoPoint::new(51.66, -2.06),
            seed: 0,
        }
    }
}

impl MotionConfig {
    fn normalized_rate(&self) -> f64 {
        self.rate_hz.max(0.001)
    }

    /// Position steps between two weather updates.
    fn weather_every(&self) -> u64 {
        let ratio = self.normalized_rate() / self.weather_rate_hz.max(0.001);
        ratio.round().max(1.0) as u64
    }
}

#[derive(Debug, Clone, Copy)]
struct Mover {
    point: GeoPoint,
    heading_deg: f64,
    speed_mps: f64,
    alt_m: f64,
}

impl Mover {
    /// Dead-reckons `dt` seconds along the current heading.
    fn advance(&mut self, dt: f64) {
        let dist = self.speed_mps * dt;
        let hdg = self.heading_deg.to_radians();
        self.point.lat += (dist * hdg.cos() / EARTH_RADIUS_M).to_degrees();
        self.point.lon +=
            (dist * hdg.sin() / (EARTH_RADIUS_M * self.point.lat.to_radians().cos())).to_degrees();
    }

    fn report(&self, at: DateTime<Utc>, alt_places: i32) -> PositionReport {
        PositionReport {
            ts: Some(at),
            lat: Some(round_to(self.point.lat, 6)),
            lon: Some(round_to(self.point.lon, 6)),
            alt_m: Some(round_to(self.alt_m, alt_places)),
            spd_mps: Some(round_to(self.speed_mps, 2)),
            hdg_deg: Some(round_to(self.heading_deg, 1)),
            src: Some("sim".into()),
            ..Default::default()
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Seeded motion model for the pace vehicle, its weather station and a
/// second aircraft. Each [`step`](Self::step) yields one fused message.
pub struct MotionGenerator {
    config: MotionConfig,
    rng: StdRng,
    step: u64,
    vehicle: Mover,
    ac2: Mover,
    weather: WeatherReport,
}

impl MotionGenerator {
    pub fn new(config: MotionConfig) -> Self {
        let start = config.start;
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            step: 0,
            vehicle: Mover {
                point: start,
                heading_deg: 90.0,
                speed_mps: 13.0,
                alt_m: 120.0,
            },
            ac2: Mover {
                point: GeoPoint::new(start.lat + 0.01, start.lon - 0.01),
                heading_deg: 250.0,
                speed_mps: 26.0,
                alt_m: 1500.0,
            },
            weather: WeatherReport::default(),
            config,
        }
    }

    /// Messages produced so far.
    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Model time of the next step, in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.step as f64 / self.config.normalized_rate()
    }

    /// Moves both entities one period forward and returns the fused message
    /// stamped `at`. Weather is refreshed at its own, slower rate; in between
    /// the latest reading is repeated.
    pub fn step(&mut self, at: DateTime<Utc>) -> TelemetrySample {
        let t = self.elapsed_secs();
        let dt = 1.0 / self.config.normalized_rate();

        let spd = StatsHelper::clamp(
            13.0 + self.rng.gen_range(-4.0..4.0) + 0.5 * (t * 0.7).sin(),
            5.0,
            35.0,
        );
        self.vehicle.speed_mps = spd;
        self.vehicle.heading_deg =
            AngleHelper::normalize_deg(self.vehicle.heading_deg + self.rng.gen_range(-2.5..2.5));
        self.vehicle.advance(dt);
        self.vehicle.alt_m += 0.15 * (t * 0.6).sin();

        self.ac2.speed_mps =
            StatsHelper::clamp(spd * 2.0 + self.rng.gen_range(-3.0..3.0), 20.0, 80.0);
        self.ac2.heading_deg =
            AngleHelper::normalize_deg(self.ac2.heading_deg + self.rng.gen_range(-2.0..2.0));
        self.ac2.advance(dt);
        self.ac2.alt_m += 0.6 * (t * 0.4).sin();

        if self.step % self.config.weather_every() == 0 {
            self.weather = self.sample_weather(t, at);
        }
        self.step += 1;

        let mut vehicle_pos = self.vehicle.report(at, 1);
        vehicle_pos.vehicle_id = Some(self.config.vehicle_id.clone());
        let mut ac2_pos = self.ac2.report(at, 0);
        ac2_pos.callsign = Some("AC2".into());

        TelemetrySample {
            vehicle: VehicleSection {
                pos: vehicle_pos,
                weather: self.weather.clone(),
            },
            ac2: TrackedSection { pos: ac2_pos },
            meta: FeedMeta {
                ts: Some(at),
                rate_hz: Some(self.config.rate_hz),
            },
        }
    }

    fn sample_weather(&mut self, t: f64, at: DateTime<Utc>) -> WeatherReport {
        let temp = 22.0 + 2.0 * (t * 0.25).sin() + self.rng.gen_range(-0.3..0.3);
        let wind = StatsHelper::clamp(
            8.0 + 3.0 * (t * 0.35).sin() + self.rng.gen_range(-0.7..0.7),
            0.0,
            25.0,
        );
        let wind_dir = AngleHelper::normalize_deg(
            180.0 + 25.0 * (t * 0.2).sin() + self.rng.gen_range(-6.0..6.0),
        );
        let rh = 45.0 + 8.0 * (t * 0.15).sin() + self.rng.gen_range(-2.0..2.0);
        let pres = 1013.25 + 1.8 * (t * 0.1).sin() + self.rng.gen_range(-0.4..0.4);

        WeatherReport {
            ts: Some(at),
            temp_c: Some(round_to(temp, 2)),
            rh_pct: Some(round_to(rh, 1)),
            pres_hpa: Some(round_to(pres, 2)),
            wind_mps: Some(round_to(wind, 2)),
            wind_dir_deg: Some(round_to(wind_dir, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn run(config: MotionConfig, steps: usize) -> Vec<TelemetrySample> {
        let mut generator = MotionGenerator::new(config);
        (0..steps)
            .map(|i| generator.step(epoch() + Duration::milliseconds(100 * i as i64)))
            .collect()
    }

    #[test]
    fn same_seed_repeats_the_chase() {
        let config = MotionConfig {
            seed: 42,
            ..Default::default()
        };
        assert_eq!(run(config.clone(), 20), run(config, 20));
    }

    #[test]
    fn speeds_stay_inside_their_bands() {
        for sample in run(MotionConfig::default(), 200) {
            let veh = sample.vehicle.pos.spd_mps.unwrap();
            let ac2 = sample.ac2.pos.spd_mps.unwrap();
            assert!((5.0..=35.0).contains(&veh), "vehicle {veh}");
            assert!((20.0..=80.0).contains(&ac2), "ac2 {ac2}");
            let wind = sample.vehicle.weather.wind_mps.unwrap();
            assert!((0.0..=25.0).contains(&wind));
            let hdg = sample.vehicle.pos.hdg_deg.unwrap();
            assert!((0.0..=360.0).contains(&hdg));
        }
    }

    #[test]
    fn second_aircraft_starts_offset_from_the_vehicle() {
        let first = &run(MotionConfig::default(), 1)[0];
        let veh = first.vehicle.pos.point().unwrap();
        let ac2 = first.ac2.pos.point().unwrap();
        assert!((ac2.lat - veh.lat - 0.01).abs() < 0.002);
        assert!((ac2.lon - veh.lon + 0.01).abs() < 0.002);
        assert_eq!(first.ac2.pos.callsign.as_deref(), Some("AC2"));
        assert_eq!(first.vehicle.pos.vehicle_id.as_deref(), Some("pace_vehicle"));
    }

    #[test]
    fn weather_refreshes_at_its_own_rate() {
        let samples = run(MotionConfig::default(), 10);
        let stamps: Vec<_> = samples
            .iter()
            .map(|s| s.vehicle.weather.ts.unwrap())
            .collect();
        assert_eq!(stamps[0], stamps[4]);
        assert_ne!(stamps[4], stamps[5]);
        assert_eq!(stamps[5], epoch() + Duration::milliseconds(500));
    }

    #[test]
    fn fused_message_carries_the_rate_hint() {
        let sample = &run(MotionConfig::default(), 1)[0];
        let decoded = TelemetrySample::decode(&sample.encode().unwrap()).unwrap();
        assert_eq!(decoded.meta.rate_hz, Some(10.0));
        assert!(decoded.vehicle.weather.temp_c.is_some());
    }
}
