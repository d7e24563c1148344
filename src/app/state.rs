use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, Timelike};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::{
    app::events::{AppEvent, start_frame_task},
    cli::Cli,
    data::{
        geoip,
        weather::{DEFAULT_GEO_URL, DEFAULT_WEATHER_URL, WeatherClient},
    },
    domain::{
        error::LookupError,
        weather::{HourlyRow, WeatherIcon, WeatherReport},
    },
    scene::{
        Scene, ThemeChange,
        clock::dial_angle,
        geom::Point,
        theme::Theme,
        tools::Tool,
        tuning::SceneTuning,
    },
    ui::layout::ScreenLayout,
};

mod input;
mod methods_fetch;

pub use methods_fetch::{LookupRequest, run_lookup, weather_client};

const PLACEHOLDER_TEMP: &str = "--°C";
const PLACEHOLDER_VALUE: &str = "--";
const FORECAST_UNAVAILABLE: &str = "Could not load forecast.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Idle,
    Loading,
    Ready,
    Error,
    Quit,
}

/// Text shown on the weather card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub location: String,
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
    pub uv_index: String,
    pub icon: WeatherIcon,
    pub hourly: Vec<HourlyRow>,
    pub hourly_note: Option<String>,
}

impl CardView {
    #[must_use]
    pub fn welcome() -> Self {
        Self {
            location: "Search for a city".to_string(),
            temperature: PLACEHOLDER_TEMP.to_string(),
            description: "Press / to search or g for your location".to_string(),
            feels_like: PLACEHOLDER_TEMP.to_string(),
            uv_index: PLACEHOLDER_VALUE.to_string(),
            icon: WeatherIcon::Cloudy,
            hourly: Vec::new(),
            hourly_note: None,
        }
    }

    #[must_use]
    pub fn from_report(report: &WeatherReport) -> Self {
        Self {
            location: report.place_name.clone(),
            temperature: format!("{}°C", report.current_temp()),
            description: report.current.description.clone(),
            feels_like: format!("{}°C", report.feels_like()),
            uv_index: format!("{}", report.current.uv_index),
            icon: report.icon(),
            hourly: report.next_hours(),
            hourly_note: None,
        }
    }

    /// Dashed-out card carrying `message` in place of the description.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            location: "Error!".to_string(),
            temperature: PLACEHOLDER_TEMP.to_string(),
            description: message.into(),
            feels_like: PLACEHOLDER_TEMP.to_string(),
            uv_index: PLACEHOLDER_VALUE.to_string(),
            icon: WeatherIcon::Cloudy,
            hourly: Vec::new(),
            hourly_note: Some(FORECAST_UNAVAILABLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    pub buffer: String,
    pub focused: bool,
}

pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub card: CardView,
    pub search: SearchBox,
    pub scene: Scene,
    pub layout: ScreenLayout,
    pub lookup_in_flight: bool,
    last_frame_at: Instant,
}

impl AppState {
    pub fn new(cli: &Cli, area: Rect, tuning: SceneTuning) -> Self {
        let layout = ScreenLayout::compute(area);
        let seed = cli.seed.unwrap_or_else(rand::random);
        let mut scene = Scene::new(
            layout.viewport(),
            layout.card_rect(),
            tuning,
            seed,
            local_time_of_day(),
        );
        if let Some(theme) = cli.theme {
            scene.set_theme(theme, ThemeChange::manual(true));
        }

        Self {
            mode: AppMode::Idle,
            running: true,
            card: CardView::welcome(),
            search: SearchBox::default(),
            scene,
            layout,
            lookup_in_flight: false,
            last_frame_at: Instant::now(),
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                cli.validate()?;
                start_frame_task(tx.clone(), cli.fps);
                if let Some(request) = LookupRequest::from_cli(cli) {
                    self.start_lookup(request, tx, cli).await?;
                }
            }
            AppEvent::TickFrame => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_frame_at);
                self.last_frame_at = now;
                self.advance(delta);
            }
            AppEvent::Input(event) => self.handle_input(event, tx, cli).await?,
            AppEvent::LookupStarted => {
                self.lookup_in_flight = true;
                self.mode = AppMode::Loading;
            }
            AppEvent::LookupSucceeded(report) => self.apply_report(&report),
            AppEvent::LookupFailed(err) => self.apply_failure(&err),
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
            }
        }

        Ok(())
    }

    /// Runs the scene forward; the frame task calls this with wall-clock deltas.
    pub fn advance(&mut self, dt: Duration) {
        self.scene.tick(dt);
    }

    pub fn resize(&mut self, area: Rect) {
        self.layout = ScreenLayout::compute(area);
        self.scene
            .resize(self.layout.viewport(), self.layout.card_rect());
    }

    fn apply_report(&mut self, report: &WeatherReport) {
        self.lookup_in_flight = false;
        self.mode = AppMode::Ready;
        self.card = CardView::from_report(report);
        log::info!(
            "weather for {}: code {} ({})",
            report.place_name,
            report.current.condition_code,
            report.icon().name()
        );
        self.scene
            .set_theme(report.theme(), ThemeChange::weather(report.city_time()));
    }

    fn apply_failure(&mut self, err: &LookupError) {
        self.lookup_in_flight = false;
        self.mode = AppMode::Error;
        self.card = CardView::error(err.to_string());
        log::warn!("lookup failed: {err}");
    }
}

/// Wall-clock time as a fraction of the day.
fn local_time_of_day() -> f64 {
    let now = Local::now();
    f64::from(now.hour() * 60 + now.minute()) / 1440.0
}
