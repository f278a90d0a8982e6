use crate::generator::motion::MotionGenerator;
use crate::workflow::config::SimulatorConfig;
use airchasecore::animation::ManualClock;
use airchasecore::render::{RecordingRenderer, TextOutput};
use airchasecore::{Dashboard, DashboardStatus};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Animation frames are stepped at 60 Hz between messages.
const FRAME: Duration = Duration::from_micros(16_667);

/// Fixed start time so replays are reproducible.
const REPLAY_EPOCH_SECS: i64 = 1_746_093_600;

pub struct ReplayResult {
    pub messages: usize,
    pub frames: usize,
    pub commands: BTreeMap<&'static str, usize>,
    pub final_texts: Vec<(TextOutput, String)>,
    pub status: DashboardStatus,
}

impl ReplayResult {
    pub fn summary(&self) -> String {
        let counts = self
            .commands
            .iter()
            .map(|(kind, count)| format!("{kind}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "messages={} frames={} {} [{}]",
            self.messages,
            self.frames,
            counts,
            self.status.summary_line()
        )
    }
}

#[derive(Clone)]
pub struct Runner {
    config: SimulatorConfig,
}

impl Runner {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Feeds `steps` generated messages through a dashboard on simulated time
    /// and reports what it drew.
    pub fn execute(&self) -> anyhow::Result<ReplayResult> {
        let motion = self.config.to_motion_config();
        let period = Duration::from_secs_f64(1.0 / motion.rate_hz.max(0.001));
        let mut generator = MotionGenerator::new(motion);

        let clock = ManualClock::new();
        let mut dashboard = Dashboard::new(
            self.config.dashboard.clone(),
            RecordingRenderer::new(),
            clock.clone(),
        )
        .context("building dashboard")?;

        let epoch = DateTime::<Utc>::from_timestamp(REPLAY_EPOCH_SECS, 0)
            .context("replay epoch out of range")?;
        let mut now = Duration::ZERO;
        let mut frames = 0;

        for index in 0..self.config.steps {
            let arrival = period * index as u32;
            clock.set(arrival);
            let offset = chrono::Duration::from_std(arrival).context("replay offset")?;
            let sample = generator.step(epoch + offset);
            let payload = sample.encode().context("encoding fused message")?;
            dashboard
                .ingest(&payload)
                .with_context(|| format!("ingesting message {index}"))?;

            let next = arrival + period;
            now = now.max(arrival);
            while now < next {
                now += FRAME;
                clock.set(now);
                dashboard.tick();
                frames += 1;
            }
        }

        let status = dashboard.status();
        let renderer = dashboard.into_renderer();
        let mut commands = BTreeMap::new();
        for command in renderer.commands() {
            *commands.entry(command.kind()).or_insert(0) += 1;
        }
        let final_texts = TextOutput::ALL
            .iter()
            .filter_map(|&output| {
                renderer
                    .last_text(output)
                    .map(|text| (output, text.to_string()))
            })
            .collect();

        Ok(ReplayResult {
            messages: self.config.steps,
            frames,
            commands,
            final_texts,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_replays_messages_through_dashboard() {
        let cfg = SimulatorConfig::from_args("pace_vehicle".into(), 10.0, 3, 30);
        let result = Runner::new(cfg).execute().unwrap();
        assert_eq!(result.messages, 30);
        assert_eq!(result.status.metrics.processed, 30);
        assert_eq!(result.status.metrics.rejected, 0);
        assert_eq!(result.final_texts.len(), TextOutput::ALL.len());
        assert_eq!(result.commands.get("fit_bounds"), Some(&1));
        assert_eq!(result.commands.get("trail_point"), Some(&60));
        assert!(result.frames >= 30 * 6);
        assert_eq!(result.status.rate_hz, Some(10.0));
    }

    #[test]
    fn replay_settles_on_the_last_reading() {
        let cfg = SimulatorConfig::from_args("pace_vehicle".into(), 5.0, 11, 12);
        let result = Runner::new(cfg).execute().unwrap();
        assert_eq!(result.status.active_tweens, 0);
        let lat = result
            .final_texts
            .iter()
            .find(|(output, _)| *output == TextOutput::VehLat)
            .map(|(_, text)| text.as_str())
            .unwrap();
        assert!(lat.starts_with("51.6"), "{lat}");
    }

    #[test]
    fn summary_lists_command_kinds() {
        let cfg = SimulatorConfig::from_args("pace_vehicle".into(), 10.0, 1, 5);
        let summary = Runner::new(cfg).execute().unwrap().summary();
        assert!(summary.starts_with("messages=5"));
        assert!(summary.contains("text="));
        assert!(summary.contains("Agg: Normal"));
    }
}
