use crate::bridge::model::{BridgeStatus, FeedModel};
use airchasecore::feed::fused_channel;
use airchasecore::TelemetrySample;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
};
use warp::{http::StatusCode, Filter};

pub fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

type SharedModel = Arc<RwLock<FeedModel>>;

/// HTTP view of the simulated feed: the visualizer polls the latest fused
/// message from here.
#[derive(Clone)]
pub struct FeedBridge {
    state: SharedModel,
}

impl FeedBridge {
    pub fn new(vehicle: &str, rate_hz: f64) -> Self {
        Self {
            state: Arc::new(RwLock::new(FeedModel::new(vehicle, rate_hz))),
        }
    }

    /// `GET /fused/<vehicle>` and `GET /status`.
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());

        let fused_route = warp::path!("fused" / String)
            .and(warp::get())
            .and(state_filter.clone())
            .map(|vehicle: String, state: SharedModel| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                match guard.latest_for(&vehicle) {
                    Some(sample) => {
                        warp::reply::with_status(warp::reply::json(sample), StatusCode::OK)
                    }
                    None => warp::reply::with_status(
                        warp::reply::json(&json!({
                            "error": format!("no data on {}", fused_channel(&vehicle))
                        })),
                        StatusCode::NOT_FOUND,
                    ),
                }
            });

        let status_route = warp::path!("status")
            .and(warp::get())
            .and(state_filter)
            .map(|state: SharedModel| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&guard.status())
            });

        fused_route.or(status_route)
    }

    /// Replaces the latest fused message.
    pub fn publish(&self, sample: TelemetrySample) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        guard.latest = Some(sample);
        guard.published += 1;
        log::trace!(
            "[bridge] {} published #{}",
            fused_channel(&guard.vehicle),
            guard.published
        );
    }

    pub fn publish_status(&self, message: &str) {
        log::info!("[bridge] {}", message);
    }

    pub fn status(&self) -> BridgeStatus {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::motion::{MotionConfig, MotionGenerator};
    use chrono::Utc;

    fn bridge_with_sample() -> FeedBridge {
        let bridge = FeedBridge::new("pace_vehicle", 10.0);
        let mut generator = MotionGenerator::new(MotionConfig::default());
        bridge.publish(generator.step(Utc::now()));
        bridge
    }

    #[test]
    fn bridge_updates_state() {
        let bridge = bridge_with_sample();
        let status = bridge.status();
        assert_eq!(status.published, 1);
        assert!(status.last_ts.is_some());
    }

    #[tokio::test]
    async fn fused_route_serves_latest_message() {
        let bridge = bridge_with_sample();
        let res = warp::test::request()
            .method("GET")
            .path("/fused/pace_vehicle")
            .reply(&bridge.routes())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let sample = TelemetrySample::decode(res.body()).unwrap();
        assert!(sample.vehicle.pos.point().is_some());
        assert_eq!(sample.meta.rate_hz, Some(10.0));
    }

    #[tokio::test]
    async fn unknown_vehicle_is_not_found() {
        let bridge = bridge_with_sample();
        let res = warp::test::request()
            .method("GET")
            .path("/fused/someone_else")
            .reply(&bridge.routes())
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_route_reports_counts() {
        let bridge = bridge_with_sample();
        let res = warp::test::request()
            .method("GET")
            .path("/status")
            .reply(&bridge.routes())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let status: BridgeStatus = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(status.vehicle, "pace_vehicle");
        assert_eq!(status.published, 1);
    }
}
