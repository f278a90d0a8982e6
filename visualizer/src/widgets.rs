use crate::panel::{AltBarState, GaugeState, PanelRenderer};
use crate::Message;
use airchasecore::math::GeoPoint;
use airchasecore::render::Track;
use airchasecore::units::gauge::{GAUGE_SPAN_DEG, GAUGE_START_DEG};
use airchasecore::units::GaugeZone;
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Theme,
};

const fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color { r, g, b, a: 1.0 }
}

const BACKGROUND: Color = rgb(0.05, 0.05, 0.07);
const RIM: Color = rgb(0.3, 0.3, 0.36);
const NEEDLE: Color = rgb(0.95, 0.95, 0.95);
const LABEL: Color = rgb(0.7, 0.7, 0.75);

fn zone_color(zone: GaugeZone) -> Color {
    match zone {
        GaugeZone::Green => rgb(0.2, 0.75, 0.35),
        GaugeZone::Amber => rgb(0.95, 0.7, 0.15),
        GaugeZone::Red => rgb(0.9, 0.25, 0.2),
    }
}

pub fn track_color(track: Track) -> Color {
    match track {
        Track::Vehicle => rgb(0.18, 0.72, 0.89),
        Track::Ac2 => rgb(0.95, 0.55, 0.2),
    }
}

/// Point at compass bearing `deg` (0 = up, clockwise) on a circle.
fn on_circle(center: Point, radius: f32, deg: f64) -> Point {
    let rad = deg.to_radians() as f32;
    Point::new(center.x + radius * rad.sin(), center.y - radius * rad.cos())
}

/// Polyline arc between two compass bearings.
fn arc(center: Point, radius: f32, from_deg: f64, to_deg: f64) -> Path {
    let steps = ((to_deg - from_deg).abs() / 3.0).ceil().max(1.0) as usize;
    Path::new(|builder| {
        for i in 0..=steps {
            let deg = from_deg + (to_deg - from_deg) * i as f64 / steps as f64;
            let point = on_circle(center, radius, deg);
            if i == 0 {
                builder.move_to(point);
            } else {
                builder.line_to(point);
            }
        }
    })
}

fn label(frame: &mut Frame, content: String, position: Point, size: f32) {
    frame.fill_text(canvas::Text {
        content,
        position,
        color: LABEL,
        size: size.into(),
        ..Default::default()
    });
}

fn background(frame: &mut Frame, bounds: Rectangle) {
    frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);
}

/// Half-dial speed gauge with green, amber and red bands.
pub struct GaugeDial {
    pub state: GaugeState,
}

impl canvas::Program<Message> for GaugeDial {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        background(&mut frame, bounds);

        let center = Point::new(bounds.width / 2.0, bounds.height * 0.8);
        let radius = (bounds.width / 2.0).min(bounds.height * 0.7) - 10.0;
        let scale = self.state.scale;
        let bearing = |v: f64| {
            let fraction = if scale.max > 0.0 { (v / scale.max).clamp(0.0, 1.0) } else { 0.0 };
            GAUGE_START_DEG + fraction * GAUGE_SPAN_DEG
        };

        for (from, to, zone) in [
            (0.0, scale.amber, GaugeZone::Green),
            (scale.amber, scale.red, GaugeZone::Amber),
            (scale.red, scale.max, GaugeZone::Red),
        ] {
            frame.stroke(
                &arc(center, radius, bearing(from), bearing(to)),
                Stroke::default().with_width(8.0).with_color(zone_color(zone)),
            );
        }

        let needle_deg = self
            .state
            .reading
            .map(|reading| reading.needle_deg)
            .unwrap_or(GAUGE_START_DEG);
        let needle = Path::line(center, on_circle(center, radius - 12.0, needle_deg));
        frame.stroke(
            &needle,
            Stroke::default().with_width(3.0).with_color(NEEDLE),
        );
        frame.fill(&Path::circle(center, 5.0), NEEDLE);

        label(
            &mut frame,
            format!("0 … {} {}", scale.max, self.state.unit.label()),
            Point::new(8.0, bounds.height - 18.0),
            12.0,
        );

        vec![frame.into_geometry()]
    }
}

/// Round compass with a single heading needle.
pub struct CompassRose {
    pub angle_deg: f64,
    pub color: Color,
}

impl canvas::Program<Message> for CompassRose {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        background(&mut frame, bounds);

        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = bounds.width.min(bounds.height) / 2.0 - 16.0;
        frame.stroke(
            &Path::circle(center, radius),
            Stroke::default().with_width(2.0).with_color(RIM),
        );

        for (deg, name) in [(0.0, "N"), (90.0, "E"), (180.0, "S"), (270.0, "W")] {
            let tick = Path::line(
                on_circle(center, radius - 6.0, deg),
                on_circle(center, radius, deg),
            );
            frame.stroke(&tick, Stroke::default().with_color(RIM));
            let at = on_circle(center, radius + 9.0, deg);
            label(&mut frame, name.into(), Point::new(at.x - 4.0, at.y - 7.0), 12.0);
        }

        let tip = on_circle(center, radius - 8.0, self.angle_deg);
        let tail = on_circle(center, radius * 0.3, self.angle_deg + 180.0);
        frame.stroke(
            &Path::line(tail, tip),
            Stroke::default().with_width(3.0).with_color(self.color),
        );
        frame.fill(&Path::circle(tip, 4.0), self.color);

        vec![frame.into_geometry()]
    }
}

/// Vertical altitude bar filled bottom-up.
pub struct AltitudeBar {
    pub state: AltBarState,
    pub color: Color,
}

impl canvas::Program<Message> for AltitudeBar {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        background(&mut frame, bounds);

        let top = 20.0;
        let height = (bounds.height - top - 6.0).max(0.0);
        let width = (bounds.width * 0.4).max(8.0);
        let left = (bounds.width - width) / 2.0;
        frame.stroke(
            &Path::rectangle(Point::new(left, top), iced::Size::new(width, height)),
            Stroke::default().with_color(RIM),
        );

        let fill = (self.state.fraction.clamp(0.0, 1.0) as f32) * height;
        frame.fill_rectangle(
            Point::new(left, top + height - fill),
            iced::Size::new(width, fill),
            self.color,
        );
        label(&mut frame, self.state.label.clone(), Point::new(4.0, 2.0), 12.0);

        vec![frame.into_geometry()]
    }
}

/// Equirectangular map of both tracks, their trails and headings.
pub struct TrackMap<'a> {
    pub panel: &'a PanelRenderer,
}

impl TrackMap<'_> {
    /// Fitted bounds widened to keep both markers in view. Before the first
    /// fit, the extent of the trails.
    fn extent(&self) -> Option<(GeoPoint, GeoPoint)> {
        let mut points: Vec<GeoPoint> = match self.panel.bounds() {
            Some((a, b)) => vec![a, b],
            None => Track::ALL
                .iter()
                .flat_map(|&track| self.panel.trail(track))
                .copied()
                .collect(),
        };
        points.extend(
            Track::ALL
                .iter()
                .filter_map(|&track| self.panel.marker(track).point),
        );
        let first = *points.first()?;
        Some(points.iter().fold((first, first), |(lo, hi), p| {
            (
                GeoPoint::new(lo.lat.min(p.lat), lo.lon.min(p.lon)),
                GeoPoint::new(hi.lat.max(p.lat), hi.lon.max(p.lon)),
            )
        }))
    }
}

/// Lat/lon window mapped onto the canvas, padded on every side.
struct Projection {
    south: f64,
    west: f64,
    lat_span: f64,
    lon_span: f64,
    size: iced::Size,
}

impl Projection {
    fn fit(a: GeoPoint, b: GeoPoint, size: iced::Size) -> Self {
        let (south, north) = (a.lat.min(b.lat), a.lat.max(b.lat));
        let (west, east) = (a.lon.min(b.lon), a.lon.max(b.lon));
        let lat_pad = ((north - south) * 0.2).max(0.002);
        let lon_pad = ((east - west) * 0.2).max(0.002);
        Self {
            south: south - lat_pad,
            west: west - lon_pad,
            lat_span: north - south + 2.0 * lat_pad,
            lon_span: east - west + 2.0 * lon_pad,
            size,
        }
    }

    fn project(&self, p: GeoPoint) -> Point {
        let x = (p.lon - self.west) / self.lon_span;
        let y = 1.0 - (p.lat - self.south) / self.lat_span;
        Point::new(
            x as f32 * self.size.width,
            y as f32 * self.size.height,
        )
    }
}

impl canvas::Program<Message> for TrackMap<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        background(&mut frame, bounds);

        let Some((a, b)) = self.extent() else {
            label(&mut frame, "Waiting for positions…".into(), Point::new(12.0, 12.0), 14.0);
            return vec![frame.into_geometry()];
        };
        let projection = Projection::fit(a, b, bounds.size());

        for track in Track::ALL {
            let color = track_color(track);
            let mut trail = self.panel.trail(track).peekable();
            if trail.peek().is_some() {
                let path = Path::new(|builder| {
                    for (i, point) in trail.enumerate() {
                        let at = projection.project(*point);
                        if i == 0 {
                            builder.move_to(at);
                        } else {
                            builder.line_to(at);
                        }
                    }
                });
                frame.stroke(&path, Stroke::default().with_width(2.0).with_color(color));
            }

            let marker = self.panel.marker(track);
            if let Some(point) = marker.point {
                let at = projection.project(point);
                frame.fill(&Path::circle(at, 6.0), color);
                let nose = on_circle(at, 14.0, marker.heading_deg);
                frame.stroke(
                    &Path::line(at, nose),
                    Stroke::default().with_width(2.0).with_color(NEEDLE),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}
