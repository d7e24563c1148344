use chrono::{DateTime, Timelike, Utc};

use crate::cli::IconMode;
use crate::scene::theme::Theme;

const DAY_STARTS: u32 = 6;
const DAY_ENDS: u32 = 20;
const HOURLY_ROWS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature_c: f32,
    pub feels_like_c: f32,
    pub uv_index: f32,
    pub condition_code: u16,
    pub description: String,
    /// Observation time, seconds since the Unix epoch.
    pub observed_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEntry {
    pub time: i64,
    pub temperature_c: f32,
    pub condition_code: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub hour: u32,
    pub temperature: i32,
    pub icon: WeatherIcon,
}

#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub place_name: String,
    pub timezone_offset: i32,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyEntry>,
}

impl WeatherReport {
    #[must_use]
    pub fn icon(&self) -> WeatherIcon {
        let is_day = is_daytime(self.current.observed_at, self.timezone_offset);
        icon_for(self.current.condition_code, is_day)
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        theme_for_icon(self.icon())
    }

    /// Local time at the reported place as a fraction of a day.
    #[must_use]
    pub fn city_time(&self) -> f64 {
        city_time_of_day(self.current.observed_at, self.timezone_offset)
    }

    #[must_use]
    pub fn current_temp(&self) -> i32 {
        round_temp(self.current.temperature_c)
    }

    #[must_use]
    pub fn feels_like(&self) -> i32 {
        round_temp(self.current.feels_like_c)
    }

    /// The twelve hours after the current one, in the place's local time.
    #[must_use]
    pub fn next_hours(&self) -> Vec<HourlyRow> {
        self.hourly
            .iter()
            .skip(1)
            .take(HOURLY_ROWS)
            .map(|entry| HourlyRow {
                hour: local_hour(entry.time, self.timezone_offset),
                temperature: round_temp(entry.temperature_c),
                icon: icon_for(
                    entry.condition_code,
                    is_daytime(entry.time, self.timezone_offset),
                ),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloudy,
    Rain,
    Sleet,
    Snow,
    Fog,
}

impl WeatherIcon {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WeatherIcon::ClearDay => "CLEAR_DAY",
            WeatherIcon::ClearNight => "CLEAR_NIGHT",
            WeatherIcon::PartlyCloudyDay => "PARTLY_CLOUDY_DAY",
            WeatherIcon::PartlyCloudyNight => "PARTLY_CLOUDY_NIGHT",
            WeatherIcon::Cloudy => "CLOUDY",
            WeatherIcon::Rain => "RAIN",
            WeatherIcon::Sleet => "SLEET",
            WeatherIcon::Snow => "SNOW",
            WeatherIcon::Fog => "FOG",
        }
    }

    #[must_use]
    pub fn glyph(self, mode: IconMode) -> &'static str {
        let (ascii, emoji, unicode) = icon_tokens(self);
        match mode {
            IconMode::Ascii => ascii,
            IconMode::Emoji => emoji,
            IconMode::Unicode => unicode,
        }
    }
}

fn icon_tokens(icon: WeatherIcon) -> (&'static str, &'static str, &'static str) {
    match icon {
        WeatherIcon::ClearDay => ("SUN", "☀️", "☀"),
        WeatherIcon::ClearNight => ("MON", "🌙", "☾"),
        WeatherIcon::PartlyCloudyDay => ("PCD", "⛅", "⛅"),
        WeatherIcon::PartlyCloudyNight => ("PCN", "☁️", "☁"),
        WeatherIcon::Cloudy => ("CLD", "☁️", "☁"),
        WeatherIcon::Rain => ("RAN", "🌧️", "☂"),
        WeatherIcon::Sleet => ("THN", "⛈️", "⚡"),
        WeatherIcon::Snow => ("SNW", "🌨️", "❄"),
        WeatherIcon::Fog => ("FOG", "🌫️", "░"),
    }
}

/// Maps an OpenWeather condition id to an icon.
#[must_use]
pub fn icon_for(code: u16, is_day: bool) -> WeatherIcon {
    match code {
        200..=299 => WeatherIcon::Sleet,
        300..=599 => WeatherIcon::Rain,
        600..=699 => WeatherIcon::Snow,
        700..=799 => WeatherIcon::Fog,
        800 if is_day => WeatherIcon::ClearDay,
        800 => WeatherIcon::ClearNight,
        801 | 802 if is_day => WeatherIcon::PartlyCloudyDay,
        801 | 802 => WeatherIcon::PartlyCloudyNight,
        _ => WeatherIcon::Cloudy,
    }
}

#[must_use]
pub fn theme_for_icon(icon: WeatherIcon) -> Theme {
    match icon {
        WeatherIcon::ClearDay => Theme::Sunny,
        WeatherIcon::ClearNight => Theme::Night,
        WeatherIcon::Rain => Theme::Rainy,
        WeatherIcon::Snow => Theme::Snowy,
        WeatherIcon::Sleet => Theme::Thunderstorm,
        WeatherIcon::Fog => Theme::Misty,
        WeatherIcon::PartlyCloudyDay | WeatherIcon::PartlyCloudyNight | WeatherIcon::Cloudy => {
            Theme::Cloudy
        }
    }
}

fn local_time(timestamp: i64, offset_seconds: i32) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp + i64::from(offset_seconds), 0).unwrap_or_default()
}

#[must_use]
pub fn local_hour(timestamp: i64, offset_seconds: i32) -> u32 {
    local_time(timestamp, offset_seconds).hour()
}

#[must_use]
pub fn is_daytime(timestamp: i64, offset_seconds: i32) -> bool {
    (DAY_STARTS..DAY_ENDS).contains(&local_hour(timestamp, offset_seconds))
}

/// Local wall-clock time at a place, as a fraction of a day.
#[must_use]
pub fn city_time_of_day(timestamp: i64, offset_seconds: i32) -> f64 {
    let local = local_time(timestamp, offset_seconds);
    f64::from(local.hour() * 60 + local.minute()) / 1440.0
}

#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_temp(value: f32) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests;
