#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::scene::theme::Theme;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconMode {
    Unicode,
    Ascii,
    Emoji,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "terminal-skies",
    version,
    about = "Animated weather-driven sky for the terminal"
)]
pub struct Cli {
    /// City to look up on start
    pub city: Option<String>,

    /// Direct latitude (requires --lon)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Direct longitude (requires --lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// OpenWeather API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the One Call base URL
    #[arg(long)]
    pub weather_url: Option<String>,

    /// Override the geocoding base URL
    #[arg(long)]
    pub geo_url: Option<String>,

    /// Start with a fixed theme (sunny, cloudy, rainy, thunderstorm, snowy, misty, night)
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Seed for the scene's random generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file overriding scene constants
    #[arg(long)]
    pub tuning: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Force ASCII icons
    #[arg(long, conflicts_with = "emoji_icons")]
    pub ascii_icons: bool,

    /// Force emoji icons
    #[arg(long)]
    pub emoji_icons: bool,

    /// Color output policy
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, conflicts_with = "no_color")]
    pub color: ColorArg,

    /// Alias for --color never
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            (Some(lat), Some(lon))
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) =>
            {
                anyhow::bail!("--lat must be within ±90 and --lon within ±180")
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn effective_color_mode(&self) -> ColorArg {
        if self.no_color {
            ColorArg::Never
        } else {
            self.color
        }
    }

    #[must_use]
    pub fn coords(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, ColorArg};
    use crate::scene::theme::Theme;

    #[test]
    fn parses_color_enum_values() {
        let cli = Cli::parse_from(["terminal-skies", "--color", "always"]);
        assert_eq!(cli.color, ColorArg::Always);
        assert!(!cli.no_color);
    }

    #[test]
    fn no_color_wins_over_auto() {
        let cli = Cli::parse_from(["terminal-skies", "--no-color"]);
        assert_eq!(cli.effective_color_mode(), ColorArg::Never);

        let cli = Cli::parse_from(["terminal-skies"]);
        assert_eq!(cli.effective_color_mode(), ColorArg::Auto);
    }

    #[test]
    fn rejects_color_and_no_color_together() {
        let err = Cli::try_parse_from(["terminal-skies", "--color", "always", "--no-color"])
            .expect_err("expected conflict");
        assert!(err.to_string().contains("--no-color"));
    }

    #[test]
    fn fps_outside_range_is_rejected() {
        assert!(Cli::try_parse_from(["terminal-skies", "--fps", "5"]).is_err());
        assert!(Cli::try_parse_from(["terminal-skies", "--fps", "61"]).is_err());
    }

    #[test]
    fn theme_flag_parses_names() {
        let cli = Cli::parse_from(["terminal-skies", "--theme", "thunderstorm"]);
        assert_eq!(cli.theme, Some(Theme::Thunderstorm));
        assert!(Cli::try_parse_from(["terminal-skies", "--theme", "tornado"]).is_err());
    }

    #[test]
    fn lat_lon_must_come_together() {
        let cli = Cli::parse_from(["terminal-skies", "--lat", "59.3"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["terminal-skies", "--lat", "-33.9", "--lon", "151.2"]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.coords(), Some((-33.9, 151.2)));
    }

    #[test]
    fn out_of_range_coordinates_fail_validation() {
        let cli = Cli::parse_from(["terminal-skies", "--lat", "91", "--lon", "0"]);
        assert!(cli.validate().is_err());
    }
}
