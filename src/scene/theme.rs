use std::{fmt, str::FromStr};

use thiserror::Error;

use super::clock::Transition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Sunny,
    Cloudy,
    Rainy,
    Thunderstorm,
    Snowy,
    Misty,
    Night,
}

impl Theme {
    pub const ALL: [Theme; 7] = [
        Theme::Sunny,
        Theme::Cloudy,
        Theme::Rainy,
        Theme::Thunderstorm,
        Theme::Snowy,
        Theme::Misty,
        Theme::Night,
    ];

    /// Ordinal used to decide melt and douse direction and rate.
    #[must_use]
    pub fn warmth(self) -> u8 {
        match self {
            Theme::Snowy => 0,
            Theme::Night | Theme::Rainy | Theme::Thunderstorm | Theme::Misty => 1,
            Theme::Cloudy => 2,
            Theme::Sunny => 3,
        }
    }

    #[must_use]
    pub fn effect(self) -> WeatherEffect {
        match self {
            Theme::Rainy | Theme::Thunderstorm => WeatherEffect::Rainy,
            Theme::Snowy => WeatherEffect::Snowy,
            _ => WeatherEffect::None,
        }
    }

    /// Rain falls on the heater in these themes.
    #[must_use]
    pub fn is_wet(self) -> bool {
        matches!(self, Theme::Rainy | Theme::Thunderstorm)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
            Theme::Thunderstorm => "thunderstorm",
            Theme::Snowy => "snowy",
            Theme::Misty => "misty",
            Theme::Night => "night",
        }
    }

    /// Tester row hotkey, `1` through `7`.
    #[must_use]
    pub fn hotkey(self) -> char {
        match self {
            Theme::Sunny => '1',
            Theme::Cloudy => '2',
            Theme::Rainy => '3',
            Theme::Thunderstorm => '4',
            Theme::Snowy => '5',
            Theme::Misty => '6',
            Theme::Night => '7',
        }
    }

    #[must_use]
    pub fn from_hotkey(key: char) -> Option<Theme> {
        Theme::ALL.into_iter().find(|theme| theme.hotkey() == key)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme '{0}'")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name() == needle)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Precipitation that the current theme produces once it is finalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherEffect {
    None,
    Rainy,
    Snowy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeState {
    current: Theme,
    previous: Theme,
    progress: f64,
    transition: Option<Transition>,
    locked: bool,
}

impl ThemeState {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            current: theme,
            previous: theme,
            progress: 1.0,
            transition: None,
            locked: false,
        }
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    #[must_use]
    pub fn previous(&self) -> Theme {
        self.previous
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// `(previous, progress)` while a cross-fade is running.
    #[must_use]
    pub fn blend(&self) -> Option<(Theme, f64)> {
        (self.is_transitioning() && self.progress < 1.0).then_some((self.previous, self.progress))
    }

    /// Switches to `theme`, recording the theme being left.
    ///
    /// Re-selecting the current theme leaves a running cross-fade untouched.
    pub fn begin(&mut self, theme: Theme, instant: bool, now_ms: f64, duration_ms: f64) {
        let changing = self.current != theme;
        if changing && !instant {
            self.transition = Some(Transition {
                started_ms: now_ms,
                duration_ms,
            });
            self.progress = 0.0;
        } else if instant {
            self.transition = None;
            self.progress = 1.0;
        }
        if changing {
            self.previous = self.current;
            self.current = theme;
        }
    }

    /// Returns `true` on the frame the cross-fade completes.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        self.progress = self.progress.max(transition.progress(now_ms));
        if self.progress >= 1.0 {
            self.transition = None;
            self.previous = self.current;
            return true;
        }
        false
    }
}
