#![allow(clippy::cast_precision_loss)]
#![allow(dead_code)]

use ratatui::layout::Rect;
use serde_json::{Value, json};
use terminal_skies::{
    app::state::AppState,
    cli::{Cli, ColorArg},
    domain::weather::{CurrentConditions, HourlyEntry, WeatherReport},
    scene::tuning::SceneTuning,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// 2024-06-01T12:00:00Z
pub const NOON_UTC: i64 = 1_717_243_200;

pub const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 100,
    height: 30,
};

pub fn base_cli() -> Cli {
    Cli {
        city: None,
        lat: None,
        lon: None,
        fps: 30,
        api_key: None,
        weather_url: None,
        geo_url: None,
        theme: None,
        seed: Some(42),
        tuning: None,
        log_file: None,
        ascii_icons: true,
        emoji_icons: false,
        color: ColorArg::Never,
        no_color: false,
    }
}

/// CLI pointed at a mock server with a key configured.
pub fn mocked_cli(server: &MockServer) -> Cli {
    Cli {
        api_key: Some("test-key".to_string()),
        weather_url: Some(server.uri()),
        geo_url: Some(server.uri()),
        ..base_cli()
    }
}

pub fn idle_state(cli: &Cli) -> AppState {
    AppState::new(cli, AREA, SceneTuning::default())
}

pub fn fixture_report(code: u16, observed_at: i64) -> WeatherReport {
    WeatherReport {
        place_name: "Stockholm".to_string(),
        timezone_offset: 0,
        current: CurrentConditions {
            temperature_c: 7.4,
            feels_like_c: 5.6,
            uv_index: 1.5,
            condition_code: code,
            description: "light rain".to_string(),
            observed_at,
        },
        hourly: (0..24)
            .map(|idx| HourlyEntry {
                time: observed_at + idx * 3600,
                temperature_c: 7.0 + idx as f32 * 0.25,
                condition_code: code,
            })
            .collect(),
    }
}

pub fn geo_body(name: &str, lat: f64, lon: f64) -> Value {
    json!([{ "name": name, "lat": lat, "lon": lon, "country": "SE" }])
}

pub fn onecall_body(code: u16, observed_at: i64, offset: i32) -> Value {
    let hourly: Vec<Value> = (0..24)
        .map(|idx| {
            json!({
                "dt": observed_at + idx * 3600,
                "temp": 18.0 + idx as f64 * 0.1,
                "weather": [{ "id": code, "description": "clear sky" }]
            })
        })
        .collect();
    json!({
        "timezone_offset": offset,
        "current": {
            "dt": observed_at,
            "temp": 21.6,
            "feels_like": 21.2,
            "uvi": 6.3,
            "weather": [{ "id": code, "description": "clear sky" }]
        },
        "hourly": hourly
    })
}

pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
