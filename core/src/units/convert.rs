use serde::{Deserialize, Serialize};

pub const MS_TO_KTS: f64 = 1.943844;
pub const MS_TO_KMH: f64 = 3.6;
pub const MS_TO_MPH: f64 = 2.23693629;
pub const M_TO_FT: f64 = 3.280839895;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SpeedUnit {
    #[default]
    #[serde(rename = "kn")]
    Knots,
    #[serde(rename = "m/s")]
    MetersPerSecond,
    #[serde(rename = "km/h")]
    KilometersPerHour,
    #[serde(rename = "mph")]
    MilesPerHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TempUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "K")]
    Kelvin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AltUnit {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "ft")]
    Feet,
}

impl SpeedUnit {
    pub const ALL: [SpeedUnit; 4] = [
        SpeedUnit::Knots,
        SpeedUnit::MetersPerSecond,
        SpeedUnit::KilometersPerHour,
        SpeedUnit::MilesPerHour,
    ];

    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedUnit::Knots => "kn",
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::KilometersPerHour => "km/h",
            SpeedUnit::MilesPerHour => "mph",
        }
    }

    fn per_mps(self) -> f64 {
        match self {
            SpeedUnit::Knots => MS_TO_KTS,
            SpeedUnit::MetersPerSecond => 1.0,
            SpeedUnit::KilometersPerHour => MS_TO_KMH,
            SpeedUnit::MilesPerHour => MS_TO_MPH,
        }
    }

    /// Converts a canonical m/s value into this unit.
    pub fn from_mps(self, mps: f64) -> f64 {
        if !mps.is_finite() {
            return f64::NAN;
        }
        mps * self.per_mps()
    }

    /// Converts a value in this unit back to m/s.
    pub fn to_mps(self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        value / self.per_mps()
    }

    /// Re-expresses a knots figure in this unit.
    pub fn from_knots(self, knots: f64) -> f64 {
        self.from_mps(SpeedUnit::Knots.to_mps(knots))
    }
}

impl TempUnit {
    pub const ALL: [TempUnit; 3] = [TempUnit::Celsius, TempUnit::Fahrenheit, TempUnit::Kelvin];

    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            TempUnit::Celsius => "°C",
            TempUnit::Fahrenheit => "°F",
            TempUnit::Kelvin => "K",
        }
    }

    pub fn from_celsius(self, c: f64) -> f64 {
        if !c.is_finite() {
            return f64::NAN;
        }
        match self {
            TempUnit::Celsius => c,
            TempUnit::Fahrenheit => c * 9.0 / 5.0 + 32.0,
            TempUnit::Kelvin => c + 273.15,
        }
    }
}

impl AltUnit {
    pub const ALL: [AltUnit; 2] = [AltUnit::Meters, AltUnit::Feet];

    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            AltUnit::Meters => "m",
            AltUnit::Feet => "ft",
        }
    }

    pub fn from_meters(self, m: f64) -> f64 {
        if !m.is_finite() {
            return f64::NAN;
        }
        match self {
            AltUnit::Meters => m,
            AltUnit::Feet => m * M_TO_FT,
        }
    }
}

/// The user's active display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UnitSelection {
    pub speed: SpeedUnit,
    pub temp: TempUnit,
    pub alt: AltUnit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knots_round_trip_through_mps() {
        let mps = SpeedUnit::Knots.to_mps(100.0);
        assert!((mps - 51.4444).abs() < 1e-3);
        assert!((SpeedUnit::Knots.from_mps(mps) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn speed_multipliers() {
        assert!((SpeedUnit::KilometersPerHour.from_mps(10.0) - 36.0).abs() < 1e-9);
        assert!((SpeedUnit::MilesPerHour.from_mps(10.0) - 22.3693629).abs() < 1e-9);
        assert_eq!(SpeedUnit::MetersPerSecond.from_mps(7.5), 7.5);
    }

    #[test]
    fn from_knots_in_kmh() {
        let kmh = SpeedUnit::KilometersPerHour.from_knots(60.0);
        assert!((kmh - 111.12).abs() < 0.01, "{kmh}");
    }

    #[test]
    fn temperature_scales() {
        assert!((TempUnit::Fahrenheit.from_celsius(100.0) - 212.0).abs() < 1e-9);
        assert!((TempUnit::Kelvin.from_celsius(0.0) - 273.15).abs() < 1e-9);
        assert_eq!(TempUnit::Celsius.from_celsius(-4.0), -4.0);
    }

    #[test]
    fn altitude_in_feet() {
        assert!((AltUnit::Feet.from_meters(1000.0) - 3280.839895).abs() < 1e-6);
    }

    #[test]
    fn non_finite_inputs_stay_non_finite() {
        assert!(SpeedUnit::Knots.from_mps(f64::NAN).is_nan());
        assert!(TempUnit::Kelvin.from_celsius(f64::INFINITY).is_nan());
        assert!(AltUnit::Feet.from_meters(f64::NAN).is_nan());
    }

    #[test]
    fn units_cycle_by_index() {
        assert_eq!(SpeedUnit::MilesPerHour.next(), SpeedUnit::Knots);
        assert_eq!(TempUnit::Kelvin.next(), TempUnit::Celsius);
        assert_eq!(AltUnit::Meters.next(), AltUnit::Feet);
        assert_eq!(SpeedUnit::from_index(6), SpeedUnit::KilometersPerHour);
    }
}
