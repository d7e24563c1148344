//! Terminal colour support and the fixed UI colours.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use ratatui::style::{Color, Modifier, Style};

use crate::{cli::ColorArg, scene::color::Rgb};

pub const TEXT: Rgb = Rgb(236, 240, 245);
pub const MUTED: Rgb = Rgb(170, 180, 192);
pub const ACCENT: Rgb = Rgb(255, 215, 117);
pub const DANGER: Rgb = Rgb(255, 120, 110);
pub const BORDER: Rgb = Rgb(150, 165, 185);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
    /// Glyphs only.
    Monochrome,
}

impl ColorCapability {
    /// The terminal colour for `rgb`, or `None` when colour is off.
    #[must_use]
    pub fn paint(self, rgb: Rgb) -> Option<Color> {
        let Rgb(r, g, b) = rgb;
        match self {
            ColorCapability::TrueColor => Some(Color::Rgb(r, g, b)),
            ColorCapability::Xterm256 => {
                let to_cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
                Some(Color::Indexed(16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b)))
            }
            ColorCapability::Basic16 => Some(basic16_from_rgb(r, g, b)),
            ColorCapability::Monochrome => None,
        }
    }

    #[must_use]
    pub fn fg(self, rgb: Rgb) -> Style {
        match self.paint(rgb) {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        }
    }

    /// Highlight for active buttons; reversed video without colour.
    #[must_use]
    pub fn active(self, rgb: Rgb) -> Style {
        match self.paint(rgb) {
            Some(color) => Style::default()
                .fg(color)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            None => Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

#[must_use]
pub fn detect_color_capability(mode: ColorArg) -> ColorCapability {
    let term = std::env::var("TERM").ok();
    let colorterm = std::env::var("COLORTERM").ok();
    let no_color = std::env::var("NO_COLOR").ok();
    detect_color_capability_from(
        mode,
        term.as_deref(),
        colorterm.as_deref(),
        no_color.as_deref(),
    )
}

fn detect_color_capability_from(
    mode: ColorArg,
    term: Option<&str>,
    colorterm: Option<&str>,
    no_color: Option<&str>,
) -> ColorCapability {
    if mode == ColorArg::Never
        || (mode == ColorArg::Auto && no_color.is_some_and(|value| !value.is_empty()))
    {
        return ColorCapability::Monochrome;
    }
    if term.is_some_and(|value| value.eq_ignore_ascii_case("dumb")) {
        return ColorCapability::Basic16;
    }
    let colorterm = colorterm.unwrap_or_default().to_lowercase();
    let term = term.unwrap_or_default().to_lowercase();
    if truecolor_hint(&colorterm) || truecolor_hint(&term) {
        ColorCapability::TrueColor
    } else if term.contains("256color") {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

fn truecolor_hint(value: &str) -> bool {
    value.contains("truecolor") || value.contains("24bit") || value.ends_with("direct")
}

fn basic16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    let rf = f32::from(r) / 255.0;
    let gf = f32::from(g) / 255.0;
    let bf = f32::from(b) / 255.0;

    let max = rf.max(gf.max(bf));
    let min = rf.min(gf.min(bf));
    let delta = max - min;
    let light = (max + min) / 2.0;

    if delta < 0.08 {
        return match light {
            l if l < 0.20 => Color::Black,
            l if l < 0.40 => Color::DarkGray,
            l if l < 0.72 => Color::Gray,
            _ => Color::White,
        };
    }

    let hue = if (max - rf).abs() < f32::EPSILON {
        60.0 * ((gf - bf) / delta).rem_euclid(6.0)
    } else if (max - gf).abs() < f32::EPSILON {
        60.0 * (((bf - rf) / delta) + 2.0)
    } else {
        60.0 * (((rf - gf) / delta) + 4.0)
    };

    let bright = light >= 0.55;
    let (dark, light_variant) = match hue {
        h if !(30.0..330.0).contains(&h) => (Color::Red, Color::LightRed),
        h if h < 90.0 => (Color::Yellow, Color::LightYellow),
        h if h < 150.0 => (Color::Green, Color::LightGreen),
        h if h < 210.0 => (Color::Cyan, Color::LightCyan),
        h if h < 270.0 => (Color::Blue, Color::LightBlue),
        _ => (Color::Magenta, Color::LightMagenta),
    };
    if bright { light_variant } else { dark }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_respects_mode_and_env() {
        let cases = [
            (ColorArg::Auto, Some("xterm-256color"), Some("truecolor"), Some(""), ColorCapability::TrueColor),
            (ColorArg::Auto, Some("xterm-256color"), Some("truecolor"), Some("1"), ColorCapability::Monochrome),
            (ColorArg::Always, Some("xterm-256color"), Some("24bit"), Some("1"), ColorCapability::TrueColor),
            (ColorArg::Auto, Some("xterm-256color"), None, None, ColorCapability::Xterm256),
            (ColorArg::Auto, Some("dumb"), None, None, ColorCapability::Basic16),
            (ColorArg::Never, Some("xterm-direct"), None, None, ColorCapability::Monochrome),
        ];

        for (mode, term, colorterm, no_color, expected) in cases {
            assert_eq!(
                detect_color_capability_from(mode, term, colorterm, no_color),
                expected,
                "{mode:?} {term:?} {colorterm:?} {no_color:?}"
            );
        }
    }

    #[test]
    fn xterm_cube_maps_extremes() {
        assert_eq!(ColorCapability::Xterm256.paint(Rgb(0, 0, 0)), Some(Color::Indexed(16)));
        assert_eq!(
            ColorCapability::Xterm256.paint(Rgb(255, 255, 255)),
            Some(Color::Indexed(231))
        );
    }

    #[test]
    fn basic16_keeps_sky_hues_apart() {
        assert_eq!(basic16_from_rgb(15, 16, 24), Color::Black);
        assert_eq!(basic16_from_rgb(30, 60, 140), Color::Blue);
        assert_eq!(basic16_from_rgb(247, 157, 81), Color::LightRed);
        assert_eq!(basic16_from_rgb(255, 255, 255), Color::White);
    }

    #[test]
    fn monochrome_paints_nothing() {
        assert_eq!(ColorCapability::Monochrome.paint(ACCENT), None);
        assert_eq!(ColorCapability::Monochrome.fg(ACCENT), Style::default());
    }
}
