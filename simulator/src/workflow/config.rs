use crate::generator::motion::MotionConfig;
use airchasecore::math::GeoPoint;
use airchasecore::DashboardConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub vehicle: String,
    pub rate_hz: f64,
    pub weather_rate_hz: f64,
    pub start_lat: f64,
    pub start_lon: f64,
    pub seed: u64,
    /// Messages replayed in offline mode.
    pub steps: usize,
    pub dashboard: DashboardConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            vehicle: "pace_vehicle".into(),
            rate_hz: 10.0,
            weather_rate_hz: 2.0,
            start_lat: 51.66,
            start_lon: -2.06,
            seed: 0,
            steps: 600,
            dashboard: DashboardConfig::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading simulator config {}", path_ref.display()))?;
        let config: SimulatorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing simulator config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_args(vehicle: String, rate_hz: f64, seed: u64, steps: usize) -> Self {
        Self {
            vehicle,
            rate_hz,
            seed,
            steps,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            anyhow::bail!("rate_hz must be positive, got {}", self.rate_hz);
        }
        if self.publish_period().is_none() {
            anyhow::bail!("rate_hz {} gives no usable publish period", self.rate_hz);
        }
        if !(self.weather_rate_hz.is_finite() && self.weather_rate_hz > 0.0) {
            anyhow::bail!(
                "weather_rate_hz must be positive, got {}",
                self.weather_rate_hz
            );
        }
        self.dashboard
            .validate()
            .context("validating dashboard section")?;
        Ok(())
    }

    /// Time between two published messages.
    pub fn publish_period(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(1.0 / self.rate_hz)
            .ok()
            .filter(|period| !period.is_zero())
    }

    pub fn to_motion_config(&self) -> MotionConfig {
        MotionConfig {
            vehicle_id: self.vehicle.clone(),
            rate_hz: self.rate_hz,
            weather_rate_hz: self.weather_rate_hz,
            start: GeoPoint::new(self.start_lat, self.start_lon),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airchasecore::units::SpeedUnit;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_motion_config() {
        let cfg = SimulatorConfig::from_args("chase_1".into(), 5.0, 9, 50);
        let motion = cfg.to_motion_config();
        assert_eq!(motion.vehicle_id, "chase_1");
        assert_eq!(motion.rate_hz, 5.0);
        assert_eq!(motion.start, GeoPoint::new(51.66, -2.06));
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"vehicle: chase_2\nrate_hz: 4\nsteps: 40\ndashboard:\n  horizon_secs: 5\n  units:\n    speed: km/h\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = SimulatorConfig::load(&path).unwrap();
        assert_eq!(cfg.vehicle, "chase_2");
        assert_eq!(cfg.steps, 40);
        assert_eq!(cfg.weather_rate_hz, 2.0);
        assert_eq!(cfg.dashboard.horizon_secs, 5.0);
        assert_eq!(cfg.dashboard.units.speed, SpeedUnit::KilometersPerHour);
    }

    #[test]
    fn config_load_rejects_bad_rates() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"rate_hz: 0\n").unwrap();
        let path = temp.into_temp_path();
        assert!(SimulatorConfig::load(&path).is_err());
    }

    #[test]
    fn config_load_rejects_unrepresentable_periods() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"dashboard:\n  horizon_secs: 1.0e20\n").unwrap();
        let path = temp.into_temp_path();
        assert!(SimulatorConfig::load(&path).is_err());

        let cfg = SimulatorConfig::from_args("chase_1".into(), 1e-30, 0, 10);
        assert!(cfg.publish_period().is_none());
        assert!(cfg.validate().is_err());
        let cfg = SimulatorConfig::from_args("chase_1".into(), 4.0, 0, 10);
        assert_eq!(cfg.publish_period(), Some(Duration::from_millis(250)));
    }
}
