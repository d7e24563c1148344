use super::*;

// 2024-06-01T12:00:00Z
const NOON_UTC: i64 = 1_717_243_200;

fn report(code: u16, observed_at: i64, offset: i32) -> WeatherReport {
    WeatherReport {
        place_name: "Testville".to_string(),
        timezone_offset: offset,
        current: CurrentConditions {
            temperature_c: 21.6,
            feels_like_c: 20.4,
            uv_index: 5.2,
            condition_code: code,
            description: "clear sky".to_string(),
            observed_at,
        },
        hourly: (0..48)
            .map(|i| HourlyEntry {
                time: observed_at + i * 3600,
                temperature_c: 20.0 + i as f32 * 0.1,
                condition_code: 800,
            })
            .collect(),
    }
}

#[test]
fn condition_ranges_map_to_icons() {
    assert_eq!(icon_for(211, true), WeatherIcon::Sleet);
    assert_eq!(icon_for(311, true), WeatherIcon::Rain);
    assert_eq!(icon_for(502, false), WeatherIcon::Rain);
    assert_eq!(icon_for(601, true), WeatherIcon::Snow);
    assert_eq!(icon_for(741, true), WeatherIcon::Fog);
    assert_eq!(icon_for(800, true), WeatherIcon::ClearDay);
    assert_eq!(icon_for(800, false), WeatherIcon::ClearNight);
    assert_eq!(icon_for(802, false), WeatherIcon::PartlyCloudyNight);
    assert_eq!(icon_for(804, true), WeatherIcon::Cloudy);
}

#[test]
fn icons_map_to_themes() {
    assert_eq!(theme_for_icon(WeatherIcon::Sleet), Theme::Thunderstorm);
    assert_eq!(theme_for_icon(WeatherIcon::PartlyCloudyDay), Theme::Cloudy);
    assert_eq!(theme_for_icon(WeatherIcon::ClearNight), Theme::Night);
    assert_eq!(theme_for_icon(WeatherIcon::Fog), Theme::Misty);
}

#[test]
fn clear_sky_at_local_midday_is_sunny() {
    let report = report(800, NOON_UTC, 0);
    assert_eq!(report.icon(), WeatherIcon::ClearDay);
    assert_eq!(report.theme(), Theme::Sunny);
}

#[test]
fn utc_offset_decides_day_and_night() {
    // Noon UTC is 21:00 in UTC+9.
    let report = report(800, NOON_UTC, 9 * 3600);
    assert_eq!(report.theme(), Theme::Night);
    assert!((report.city_time() - 21.0 / 24.0).abs() < 1e-9);
}

#[test]
fn day_window_is_half_open() {
    let six = NOON_UTC - 6 * 3600;
    assert!(is_daytime(six, 0));
    assert!(!is_daytime(six - 60, 0));
    assert!(!is_daytime(NOON_UTC + 8 * 3600, 0));
}

#[test]
fn next_hours_skips_current_and_keeps_twelve() {
    let report = report(800, NOON_UTC, 0);
    let rows = report.next_hours();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0].hour, 13);
    assert_eq!(rows[11].hour, 0);
    assert_eq!(rows[11].icon, WeatherIcon::ClearNight);
}

#[test]
fn temperatures_round_to_whole_degrees() {
    let report = report(800, NOON_UTC, 0);
    assert_eq!(report.current_temp(), 22);
    assert_eq!(report.feels_like(), 20);
}

#[test]
fn ascii_glyphs_stay_short() {
    assert_eq!(WeatherIcon::ClearDay.glyph(IconMode::Ascii), "SUN");
    assert_eq!(WeatherIcon::Sleet.glyph(IconMode::Unicode), "⚡");
}
