use geomarkcore::model::location::format_degrees;
use geomarkcore::render::Viewport;
use geomarkcore::{MapPoint, MapView, PointKind};
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8501";

fn main() -> iced::Result {
    iced::application(Viewer::boot, Viewer::update, Viewer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Viewer) -> String {
    "Geomark Viewer".into()
}

fn application_subscription(_: &Viewer) -> Subscription<Message> {
    time::every(Duration::from_secs(5)).map(|_| Message::Tick)
}

fn application_theme(_: &Viewer) -> Theme {
    Theme::Light
}

/// Base URL of the geomark server, overridable with `GEOMARK_SERVER`.
fn server_url() -> String {
    std::env::var("GEOMARK_SERVER")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_SERVER.to_string())
}

#[derive(Debug)]
struct Viewer {
    server: String,
    view: Option<MapView>,
    name: String,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PointsFetched(Result<MapView, String>),
    NameChanged(String),
    SubmitSave,
    SaveSubmitted(Result<String, String>),
    RefreshLocation,
}

impl Viewer {
    fn boot() -> (Self, Task<Message>) {
        let server = server_url();
        (
            Viewer {
                server: server.clone(),
                view: None,
                name: String::new(),
                status: format!("Connecting to {server}..."),
                history: Vec::new(),
            },
            Task::perform(refresh_location(server), Message::PointsFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                Task::perform(fetch_points(state.server.clone()), Message::PointsFetched)
            }
            Message::RefreshLocation => {
                state.push_history("Location refresh requested".into());
                Task::perform(refresh_location(state.server.clone()), Message::PointsFetched)
            }
            Message::PointsFetched(Ok(view)) => {
                state.status = match view.current() {
                    Some(here) => format!(
                        "My location: {}, {} / {} saved",
                        format_degrees(here.latitude),
                        format_degrees(here.longitude),
                        view.saved().count()
                    ),
                    None => "Location not found. Check that geolocation is available.".into(),
                };
                state.view = Some(view);
                Task::none()
            }
            Message::PointsFetched(Err(err)) => {
                state.status = format!("Server error: {err}");
                Task::none()
            }
            Message::NameChanged(value) => {
                state.name = value;
                Task::none()
            }
            Message::SubmitSave => {
                let name = state.name.trim().to_string();
                if name.is_empty() {
                    return Task::none();
                }
                Task::perform(post_save(state.server.clone(), name), Message::SaveSubmitted)
            }
            Message::SaveSubmitted(Ok(message)) => {
                state.push_history(message.clone());
                state.status = message;
                state.name.clear();
                Task::perform(fetch_points(state.server.clone()), Message::PointsFetched)
            }
            Message::SaveSubmitted(Err(err)) => {
                state.status = format!("Save error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let points = state
            .view
            .as_ref()
            .map(|view| view.points.clone())
            .unwrap_or_default();

        let saved_entries = points
            .iter()
            .filter(|point| point.kind == PointKind::Saved)
            .enumerate()
            .fold(Column::new().spacing(4), |col, (idx, point)| {
                col.push(
                    text(format!(
                        "Location {}: {} - Latitude: {}, Longitude: {}",
                        idx + 1,
                        point.label,
                        format_degrees(point.latitude),
                        format_degrees(point.longitude)
                    ))
                    .size(12),
                )
            });
        let saved_list = if points.iter().any(|point| point.kind == PointKind::Saved) {
            saved_entries
        } else {
            Column::new().push(text("No locations saved yet.").size(12))
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let sidebar = column![
            text("Location Finder").size(26),
            text_input("Name this marker", &state.name)
                .on_input(Message::NameChanged)
                .on_submit(Message::SubmitSave)
                .padding(6),
            row![
                button("Save location")
                    .on_press(Message::SubmitSave)
                    .padding(10),
                button("Refresh location")
                    .on_press(Message::RefreshLocation)
                    .padding(10),
            ]
            .spacing(10),
            text(&state.status).size(14),
            text("Saved locations").size(18),
            Container::new(scrollable(saved_list).height(Length::Fixed(260.0))).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let map = Canvas::new(PointMap { points })
            .width(Length::Fill)
            .height(Length::Fixed(480.0));

        let map_column = column![
            text("Map (blue = my location, green = saved)").size(16),
            map
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![sidebar, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_points(server: String) -> Result<MapView, String> {
    let response = reqwest::get(format!("{server}/api/points"))
        .await
        .map_err(|e| e.to_string())?;
    response.json::<MapView>().await.map_err(|e| e.to_string())
}

async fn refresh_location(server: String) -> Result<MapView, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{server}/api/refresh"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    response.json::<MapView>().await.map_err(|e| e.to_string())
}

#[derive(Debug, Deserialize)]
struct SaveReply {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

async fn post_save(server: String, name: String) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{server}/api/save"))
        .json(&json!({ "name": name }))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = response.status();
    let reply = response
        .json::<SaveReply>()
        .await
        .map_err(|e| format!("{status}: {e}"))?;
    match reply.status.as_str() {
        "saved" => Ok(format!("Saved {name:?}")),
        "location_unknown" => Ok("Location not found, nothing saved.".into()),
        "empty_name" => Ok("Nothing saved: the name is blank.".into()),
        _ => Err(reply.error.unwrap_or_else(|| status.to_string())),
    }
}

#[derive(Clone)]
struct PointMap {
    points: Vec<MapPoint>,
}

impl canvas::Program<Message> for PointMap {
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
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.87, 0.93, 0.97),
        );

        let viewport = Viewport::fit(&self.points, bounds.width as f64, bounds.height as f64);
        let grid = Path::new(|builder| {
            for latitude in (-60..=60).step_by(30) {
                let (_, y) = viewport.project(latitude as f64, 0.0);
                builder.move_to(Point::new(0.0, y as f32));
                builder.line_to(Point::new(bounds.width, y as f32));
            }
            for longitude in (-150..=150).step_by(30) {
                let (x, _) = viewport.project(0.0, longitude as f64);
                builder.move_to(Point::new(x as f32, 0.0));
                builder.line_to(Point::new(x as f32, bounds.height));
            }
        });
        frame.stroke(
            &grid,
            Stroke::default()
                .with_color(Color::from_rgb(0.72, 0.8, 0.85))
                .with_width(1.0),
        );

        for point in &self.points {
            let (x, y) = viewport.project(point.latitude, point.longitude);
            let center = Point::new(x as f32, y as f32);
            let (color, radius) = match point.kind {
                PointKind::Current => (Color::from_rgb(0.17, 0.48, 0.84), 8.0),
                PointKind::Saved => (Color::from_rgb(0.18, 0.62, 0.31), 5.5),
            };
            let marker = Path::new(|builder| builder.circle(center, radius));
            frame.fill(&marker, color);
            frame.stroke(&marker, Stroke::default().with_color(Color::WHITE).with_width(1.5));
            frame.fill_text(canvas::Text {
                content: point.label.clone(),
                position: Point::new(center.x + radius + 3.0, center.y - 7.0),
                color: Color::from_rgb(0.11, 0.17, 0.21),
                size: 12.0.into(),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
