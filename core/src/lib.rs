//! Presentation core for the Airchase live telemetry dashboard.
//!
//! Telemetry samples are aggregated per signal, converted to the user's
//! units and handed to a tween scheduler; each animation frame turns the
//! running tweens into render commands for whatever draws the dashboard.

pub mod aggregation;
pub mod animation;
pub mod diagnostics;
pub mod feed;
pub mod math;
pub mod prelude;
pub mod presentation;
pub mod render;
pub mod units;

pub use feed::TelemetrySample;
pub use prelude::{DashboardConfig, DashboardError, DashboardResult};
pub use presentation::{Dashboard, DashboardStatus};
pub use render::{RenderCommand, Renderer};
