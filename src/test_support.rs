use ratatui::layout::Rect;

use crate::{
    cli::{Cli, ColorArg},
    domain::weather::{CurrentConditions, HourlyEntry, WeatherReport},
};

/// 2024-06-01T12:00:00Z
pub(crate) const NOON_UTC: i64 = 1_717_243_200;

pub(crate) const TEST_AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 100,
    height: 30,
};

pub(crate) fn test_cli() -> Cli {
    Cli {
        city: None,
        lat: None,
        lon: None,
        fps: 30,
        api_key: None,
        weather_url: None,
        geo_url: None,
        theme: None,
        seed: Some(7),
        tuning: None,
        log_file: None,
        ascii_icons: false,
        emoji_icons: false,
        color: ColorArg::Auto,
        no_color: false,
    }
}

pub(crate) fn fixture_report(code: u16, observed_at: i64, offset: i32) -> WeatherReport {
    WeatherReport {
        place_name: "Stockholm".to_string(),
        timezone_offset: offset,
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
