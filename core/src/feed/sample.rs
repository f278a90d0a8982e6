use crate::math::GeoPoint;
use crate::prelude::DashboardResult;
use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads a number leniently: JSON numbers and numeric strings are accepted,
/// anything else (null, text, bools, objects) becomes `None` instead of
/// failing the whole message. Non-finite results are dropped as well.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let value = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

/// RFC 3339 timestamp; unparseable text is treated as absent.
fn lenient_ts<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        _ => None,
    })
}

/// Free text; anything that is not a string is treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// Decodes a nested section. `null`, scalars and arrays leave the section at
/// its default so the rest of the message still applies.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Object(_) => serde_json::from_value(raw).unwrap_or_default(),
        _ => T::default(),
    })
}

/// Position report for one tracked entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    #[serde(default, deserialize_with = "lenient_ts", skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub alt_m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub spd_mps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub hdg_deg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl PositionReport {
    /// Both coordinates, when both are present.
    pub fn point(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lon?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default, deserialize_with = "lenient_ts", skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub temp_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub rh_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub pres_hpa: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub wind_mps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub wind_dir_deg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleSection {
    #[serde(default, deserialize_with = "lenient_section")]
    pub pos: PositionReport,
    #[serde(default, deserialize_with = "lenient_section")]
    pub weather: WeatherReport,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedSection {
    #[serde(default, deserialize_with = "lenient_section")]
    pub pos: PositionReport,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMeta {
    #[serde(default, deserialize_with = "lenient_ts", skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,
    /// Publisher's declared update rate.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub rate_hz: Option<f64>,
}

/// One fused message from the feed: the pace vehicle, its weather station
/// and a second tracked aircraft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(default, deserialize_with = "lenient_section")]
    pub vehicle: VehicleSection,
    #[serde(default, deserialize_with = "lenient_section")]
    pub ac2: TrackedSection,
    #[serde(default, deserialize_with = "lenient_section")]
    pub meta: FeedMeta,
}

impl TelemetrySample {
    /// Decodes a raw payload. Only a payload that is not a JSON object fails;
    /// bad individual fields and sections decode as absent.
    pub fn decode(payload: &[u8]) -> DashboardResult<Self> {
        match serde_json::from_slice::<serde_json::Value>(payload)? {
            raw @ serde_json::Value::Object(_) => Ok(serde_json::from_value(raw)?),
            _ => Err(serde_json::Error::custom("payload is not a JSON object").into()),
        }
    }

    pub fn encode(&self) -> DashboardResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Name of the fused channel for a vehicle id.
pub fn fused_channel(vehicle: &str) -> String {
    format!("airchase/fused/{vehicle}")
}
