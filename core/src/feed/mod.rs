pub mod cadence;
pub mod sample;

pub use cadence::CadenceEstimator;
pub use sample::{
    fused_channel, FeedMeta, PositionReport, TelemetrySample, TrackedSection, VehicleSection,
    WeatherReport,
};
