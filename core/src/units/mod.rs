pub mod convert;
pub mod gauge;

pub use convert::{AltUnit, SpeedUnit, TempUnit, UnitSelection};
pub use gauge::{GaugeReading, GaugeScale, GaugeZone};
