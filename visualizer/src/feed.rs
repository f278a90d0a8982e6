use airchasecore::animation::Clock;
use airchasecore::{Dashboard, DashboardResult, Renderer, TelemetrySample};
use chrono::{DateTime, Utc};

/// Hands polled payloads to the dashboard once each.
///
/// The bridge keeps serving its latest message until the next one is
/// published, so a poll can return a message that was already applied.
/// Messages are told apart by their `meta.ts` stamp; unstamped messages are
/// always applied.
#[derive(Debug, Default)]
pub struct PollFeed {
    last_stamp: Option<DateTime<Utc>>,
    repeats: u64,
}

impl PollFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `payload` unless it repeats the previous message. Returns
    /// whether the dashboard saw it.
    pub fn apply<R: Renderer, C: Clock>(
        &mut self,
        dashboard: &mut Dashboard<R, C>,
        payload: &[u8],
    ) -> DashboardResult<bool> {
        let Ok(sample) = TelemetrySample::decode(payload) else {
            // counted and logged by the dashboard
            return dashboard.ingest(payload).map(|_| true);
        };
        if let Some(stamp) = sample.meta.ts {
            if self.last_stamp == Some(stamp) {
                self.repeats += 1;
                log::trace!("skipping repeated message stamped {stamp}");
                return Ok(false);
            }
            self.last_stamp = Some(stamp);
        }
        dashboard.push(&sample);
        Ok(true)
    }

    /// Polls that returned an already applied message.
    pub fn repeats(&self) -> u64 {
        self.repeats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelRenderer;
    use airchasecore::aggregation::SignalKey;
    use airchasecore::animation::ManualClock;
    use airchasecore::render::Track;
    use airchasecore::DashboardConfig;

    fn message(ts: &str, spd: f64, lon: f64) -> Vec<u8> {
        format!(
            r#"{{"vehicle": {{"pos": {{"spd_mps": {spd}, "lat": 51.66, "lon": {lon}}}}},
                "meta": {{"ts": "{ts}", "rate_hz": 10}}}}"#
        )
        .into_bytes()
    }

    fn dashboard() -> (Dashboard<PanelRenderer, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let dash = Dashboard::new(DashboardConfig::default(), PanelRenderer::new(), clock.clone())
            .unwrap();
        (dash, clock)
    }

    #[test]
    fn repeated_poll_is_applied_once() {
        let (mut dash, clock) = dashboard();
        let mut feed = PollFeed::new();
        let first = message("2025-05-01T10:00:00.0Z", 10.0, -2.06);
        let second = message("2025-05-01T10:00:00.1Z", 30.0, -2.0599);

        assert!(feed.apply(&mut dash, &first).unwrap());
        clock.advance_ms(50);
        assert!(!feed.apply(&mut dash, &first).unwrap());
        clock.advance_ms(50);
        assert!(feed.apply(&mut dash, &second).unwrap());

        let state = dash.session().aggregator.state(SignalKey::VehSpd).unwrap();
        assert_eq!(state.window_len(), 2);
        assert_eq!(state.window_mean(), Some(20.0));
        assert_eq!(dash.renderer().trail(Track::Vehicle).count(), 2);
        assert_eq!(dash.status().metrics.processed, 2);
        assert_eq!(feed.repeats(), 1);
    }

    #[test]
    fn unstamped_messages_are_always_applied() {
        let (mut dash, _clock) = dashboard();
        let mut feed = PollFeed::new();
        let payload = br#"{"vehicle": {"pos": {"spd_mps": 12}}}"#;
        assert!(feed.apply(&mut dash, payload).unwrap());
        assert!(feed.apply(&mut dash, payload).unwrap());
        assert_eq!(dash.status().metrics.processed, 2);
    }

    #[test]
    fn malformed_payload_is_rejected_by_the_dashboard() {
        let (mut dash, _clock) = dashboard();
        let mut feed = PollFeed::new();
        assert!(feed.apply(&mut dash, b"{oops").is_err());
        assert_eq!(dash.status().metrics.rejected, 1);
    }
}
