use airchasecore::animation::MonotonicClock;
use airchasecore::render::{CompassOutput, GaugeOutput, TextOutput, Track};
use airchasecore::{Dashboard, DashboardConfig};
use feed::PollFeed;
use iced::{
    time,
    widget::{button, column, row, text, Canvas, Column, Container, Row},
    Alignment, Color, Element, Length, Subscription, Task, Theme,
};
use panel::PanelRenderer;
use serde::Deserialize;
use std::time::Duration;
use widgets::{track_color, AltitudeBar, CompassRose, GaugeDial, TrackMap};

mod feed;
mod panel;
mod widgets;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const STATUS_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_POLL: Duration = Duration::from_millis(100);

fn main() -> iced::Result {
    env_logger::init();
    let settings = Settings::from_lookup(|key| std::env::var(key).ok());
    log::info!(
        "polling {} for vehicle {}",
        settings.host,
        settings.vehicle
    );

    iced::application(
        move || Visualizer::boot(settings.clone()),
        Visualizer::update,
        Visualizer::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .run()
}

fn application_title(_: &Visualizer) -> String {
    "Airchase Dashboard".into()
}

fn application_subscription(state: &Visualizer) -> Subscription<Message> {
    Subscription::batch([
        time::every(FRAME_INTERVAL).map(|_| Message::Frame),
        time::every(state.poll_interval()).map(|_| Message::Poll),
        time::every(STATUS_INTERVAL).map(|_| Message::RefreshStatus),
    ])
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

/// Where to find the simulator bridge, from `AIRCHASE_*` environment
/// variables.
#[derive(Debug, Clone)]
struct Settings {
    host: String,
    vehicle: String,
    config: DashboardConfig,
}

impl Settings {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = DashboardConfig::default();
        if let Some(raw) = lookup("AIRCHASE_HORIZON_SECS") {
            match raw.trim().parse::<f64>() {
                Ok(secs) => config.horizon_secs = secs,
                Err(err) => log::warn!("ignoring AIRCHASE_HORIZON_SECS={raw}: {err}"),
            }
        }
        Self {
            host: lookup("AIRCHASE_HOST").unwrap_or_else(|| "127.0.0.1:9000".into()),
            vehicle: lookup("AIRCHASE_VEHICLE").unwrap_or_else(|| "pace_vehicle".into()),
            config,
        }
    }

    fn fused_url(&self) -> String {
        format!("http://{}/fused/{}", self.host, self.vehicle)
    }

    fn status_url(&self) -> String {
        format!("http://{}/status", self.host)
    }
}

/// Subset of the bridge's `/status` reply shown in the status line.
#[derive(Debug, Clone, Deserialize)]
struct BridgeStatus {
    vehicle: String,
    rate_hz: f64,
    published: u64,
}

type PanelDashboard = Dashboard<PanelRenderer, MonotonicClock>;

struct Visualizer {
    settings: Settings,
    dashboard: Option<PanelDashboard>,
    feed: PollFeed,
    polling: bool,
    feed_error: Option<String>,
    bridge: Option<BridgeStatus>,
}

#[derive(Debug, Clone)]
enum Message {
    Frame,
    Poll,
    Fetched(Result<Vec<u8>, String>),
    RefreshStatus,
    StatusFetched(Result<BridgeStatus, String>),
    CycleSpeedUnit,
    CycleTempUnit,
    CycleAltUnit,
    CycleAnimation,
    CycleAggregation,
}

impl Visualizer {
    fn boot(settings: Settings) -> (Self, Task<Message>) {
        let (dashboard, feed_error) = match Dashboard::new(
            settings.config.clone(),
            PanelRenderer::new(),
            MonotonicClock::new(),
        ) {
            Ok(dashboard) => (Some(dashboard), None),
            Err(err) => {
                log::error!("dashboard not started: {err}");
                (None, Some(err.to_string()))
            }
        };
        let status_url = settings.status_url();
        (
            Visualizer {
                settings,
                dashboard,
                feed: PollFeed::new(),
                polling: false,
                feed_error,
                bridge: None,
            },
            Task::perform(fetch_status(status_url), Message::StatusFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        let Some(dashboard) = state.dashboard.as_mut() else {
            return Task::none();
        };
        match message {
            Message::Frame => {
                dashboard.tick();
                Task::none()
            }
            Message::Poll => {
                if state.polling {
                    return Task::none();
                }
                state.polling = true;
                Task::perform(fetch_fused(state.settings.fused_url()), Message::Fetched)
            }
            Message::Fetched(Ok(payload)) => {
                state.polling = false;
                state.feed_error = state
                    .feed
                    .apply(dashboard, &payload)
                    .err()
                    .map(|err| err.to_string());
                Task::none()
            }
            Message::Fetched(Err(err)) => {
                state.polling = false;
                state.feed_error = Some(err);
                Task::none()
            }
            Message::RefreshStatus => {
                Task::perform(fetch_status(state.settings.status_url()), Message::StatusFetched)
            }
            Message::StatusFetched(Ok(status)) => {
                state.bridge = Some(status);
                Task::none()
            }
            Message::StatusFetched(Err(err)) => {
                log::debug!("bridge status unavailable: {err}");
                state.bridge = None;
                Task::none()
            }
            Message::CycleSpeedUnit => {
                dashboard.cycle_speed_unit();
                Task::none()
            }
            Message::CycleTempUnit => {
                dashboard.cycle_temp_unit();
                Task::none()
            }
            Message::CycleAltUnit => {
                dashboard.cycle_alt_unit();
                Task::none()
            }
            Message::CycleAnimation => {
                dashboard.cycle_anim_mode();
                Task::none()
            }
            Message::CycleAggregation => {
                dashboard.cycle_aggregation_mode();
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let Some(dashboard) = state.dashboard.as_ref() else {
            let reason = state.feed_error.clone().unwrap_or_default();
            return Container::new(text(format!("Dashboard unavailable: {reason}")).size(18))
                .padding(20)
                .into();
        };
        let panel = dashboard.renderer();
        let status = dashboard.status();
        let units = panel.units();

        let controls = row![
            button(text(format!("Speed: {}", units.speed.label())))
                .on_press(Message::CycleSpeedUnit)
                .padding(8),
            button(text(format!("Temp: {}", units.temp.label())))
                .on_press(Message::CycleTempUnit)
                .padding(8),
            button(text(format!("Alt: {}", units.alt.label())))
                .on_press(Message::CycleAltUnit)
                .padding(8),
            button(text(format!("Anim: {}", status.animation.label())))
                .on_press(Message::CycleAnimation)
                .padding(8),
            button(text(format!("Agg: {}", status.aggregation_label)))
                .on_press(Message::CycleAggregation)
                .padding(8),
        ]
        .spacing(8);

        let feed_line = match (&state.feed_error, &state.bridge) {
            (Some(err), _) => format!("Feed error: {err}"),
            (None, Some(bridge)) => format!(
                "{} @ {:.1} Hz, {} published, {} repeats skipped",
                bridge.vehicle,
                bridge.rate_hz,
                bridge.published,
                state.feed.repeats()
            ),
            (None, None) => format!("Waiting for {}", state.settings.fused_url()),
        };

        let gauges = GaugeOutput::ALL
            .iter()
            .fold(Row::new().spacing(12), |row, &gauge| {
                row.push(gauge_panel(panel, gauge))
            });
        let compasses = [CompassOutput::Vehicle, CompassOutput::Ac2, CompassOutput::Wind]
            .iter()
            .fold(Row::new().spacing(12), |row, &compass| {
                row.push(compass_panel(panel, compass))
            });
        let alt_bars = Track::ALL
            .iter()
            .fold(Row::new().spacing(12), |row, &track| {
                row.push(alt_panel(panel, track))
            });

        let instruments = column![
            controls,
            text(format!("{} • {}", status.summary_line(), feed_line)).size(14),
            gauges,
            compasses,
            row![
                alt_bars,
                column![
                    text(format!(
                        "Temp {} {}",
                        panel.text(TextOutput::Temp),
                        units.temp.label()
                    ))
                    .size(20),
                    text(format!(
                        "Wind {} {} from {}°",
                        panel.text(TextOutput::Wind),
                        units.speed.label(),
                        panel.text(TextOutput::WindDir)
                    ))
                    .size(16),
                ]
                .spacing(6),
            ]
            .spacing(16)
            .align_y(Alignment::Start),
        ]
        .spacing(12)
        .width(Length::Fixed(720.0));

        let map_column = column![
            text("Map").size(22),
            Canvas::new(TrackMap { panel })
                .width(Length::Fill)
                .height(Length::Fixed(420.0)),
            coordinates(panel, Track::Vehicle),
            coordinates(panel, Track::Ac2),
        ]
        .spacing(8)
        .width(Length::Fill);

        let layout = row![instruments, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Polls once per expected message, within sane limits.
    fn poll_interval(&self) -> Duration {
        self.dashboard
            .as_ref()
            .and_then(|dashboard| dashboard.status().rate_hz)
            .map(|hz| Duration::from_secs_f64((1.0 / hz).clamp(0.02, 1.0)))
            .unwrap_or(DEFAULT_POLL)
    }
}

fn gauge_panel(panel: &PanelRenderer, gauge: GaugeOutput) -> Element<'_, Message> {
    let (title, reading) = match gauge {
        GaugeOutput::Vehicle => ("Vehicle speed", TextOutput::VehSpeed),
        GaugeOutput::Ac2 => ("AC2 speed", TextOutput::Ac2Speed),
        GaugeOutput::Wind => ("Wind", TextOutput::Wind),
    };
    column![
        text(title).size(16),
        Canvas::new(GaugeDial {
            state: panel.gauge(gauge)
        })
        .width(Length::Fixed(220.0))
        .height(Length::Fixed(130.0)),
        text(format!(
            "{} {}",
            panel.text(reading),
            panel.units().speed.label()
        ))
        .size(22),
    ]
    .spacing(4)
    .into()
}

fn compass_panel(panel: &PanelRenderer, compass: CompassOutput) -> Element<'_, Message> {
    let (title, reading, color) = match compass {
        CompassOutput::Vehicle => (
            "Vehicle heading",
            TextOutput::VehHeading,
            track_color(Track::Vehicle),
        ),
        CompassOutput::Ac2 => ("AC2 heading", TextOutput::Ac2Heading, track_color(Track::Ac2)),
        CompassOutput::Wind => (
            "Wind direction",
            TextOutput::WindDir,
            Color::from_rgb(0.85, 0.85, 0.9),
        ),
    };
    column![
        text(title).size(16),
        Canvas::new(CompassRose {
            angle_deg: panel.compass(compass),
            color,
        })
        .width(Length::Fixed(160.0))
        .height(Length::Fixed(160.0)),
        text(format!("{}°", panel.text(reading))).size(20),
    ]
    .spacing(4)
    .into()
}

fn alt_panel(panel: &PanelRenderer, track: Track) -> Element<'_, Message> {
    let (title, reading) = match track {
        Track::Vehicle => ("Vehicle alt", TextOutput::VehAlt),
        Track::Ac2 => ("AC2 alt", TextOutput::Ac2Alt),
    };
    column![
        text(title).size(14),
        Canvas::new(AltitudeBar {
            state: panel.alt_bar(track),
            color: track_color(track),
        })
        .width(Length::Fixed(90.0))
        .height(Length::Fixed(200.0)),
        text(format!(
            "{} {}",
            panel.text(reading),
            panel.units().alt.label()
        ))
        .size(18),
    ]
    .spacing(4)
    .into()
}

fn coordinates(panel: &PanelRenderer, track: Track) -> Column<'_, Message> {
    let (title, lat, lon) = match track {
        Track::Vehicle => ("Vehicle", TextOutput::VehLat, TextOutput::VehLon),
        Track::Ac2 => ("AC2", TextOutput::Ac2Lat, TextOutput::Ac2Lon),
    };
    column![text(format!(
        "{title}: {}, {}",
        panel.text(lat),
        panel.text(lon)
    ))
    .size(14)
    .color(track_color(track))]
}

async fn fetch_fused(url: String) -> Result<Vec<u8>, String> {
    let response = reqwest::get(&url).await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("{} from {}", response.status(), url));
    }
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| e.to_string())
}

async fn fetch_status(url: String) -> Result<BridgeStatus, String> {
    let response = reqwest::get(&url).await.map_err(|e| e.to_string())?;
    response
        .json::<BridgeStatus>()
        .await
        .map_err(|e| e.to_string())
}
