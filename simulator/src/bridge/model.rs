use airchasecore::TelemetrySample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest fused message held by the bridge.
#[derive(Debug, Clone, Default)]
pub struct FeedModel {
    pub vehicle: String,
    pub rate_hz: f64,
    pub published: u64,
    pub latest: Option<TelemetrySample>,
}

impl FeedModel {
    pub fn new(vehicle: impl Into<String>, rate_hz: f64) -> Self {
        Self {
            vehicle: vehicle.into(),
            rate_hz,
            ..Default::default()
        }
    }

    /// The latest message, if `vehicle` is the one being simulated.
    pub fn latest_for(&self, vehicle: &str) -> Option<&TelemetrySample> {
        self.latest.as_ref().filter(|_| self.vehicle == vehicle)
    }

    pub fn status(&self) -> BridgeStatus {
        BridgeStatus {
            vehicle: self.vehicle.clone(),
            rate_hz: self.rate_hz,
            published: self.published,
            last_ts: self.latest.as_ref().and_then(|sample| sample.meta.ts),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeStatus {
    pub vehicle: String,
    pub rate_hz: f64,
    pub published: u64,
    pub last_ts: Option<DateTime<Utc>>,
}
