use crate::aggregation::SignalAggregator;
use crate::animation::AnimMode;
use crate::feed::CadenceEstimator;
use crate::prelude::DashboardConfig;
use crate::units::UnitSelection;

/// Everything the user can toggle, plus what the dashboard has learned about
/// the feed. One per dashboard; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct Session {
    pub units: UnitSelection,
    pub animation: AnimMode,
    pub aggregator: SignalAggregator,
    pub cadence: CadenceEstimator,
}

impl Session {
    pub fn from_config(config: &DashboardConfig) -> Self {
        let mut aggregator = SignalAggregator::new(config.horizon());
        aggregator.set_mode(config.aggregation);
        Self {
            units: config.units,
            animation: config.animation,
            aggregator,
            cadence: CadenceEstimator::new(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}
