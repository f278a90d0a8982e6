pub mod angle;
pub mod geo;
pub mod stats;

pub use angle::AngleHelper;
pub use geo::{GeoHelper, GeoPoint};
pub use stats::StatsHelper;
