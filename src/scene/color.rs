use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[must_use]
    pub const fn hex(value: u32) -> Self {
        Self(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    #[must_use]
    pub fn lerp(self, other: Rgb, amount: f64) -> Rgb {
        Rgb(
            lerp_channel(self.0, other.0, amount),
            lerp_channel(self.1, other.1, amount),
            lerp_channel(self.2, other.2, amount),
        )
    }

    /// Alpha-composites `self` over `base`.
    #[must_use]
    pub fn over(self, base: Rgb, alpha: f32) -> Rgb {
        base.lerp(self, f64::from(alpha.clamp(0.0, 1.0)))
    }

    #[must_use]
    pub fn scale(self, factor: f32) -> Rgb {
        let f = factor.max(0.0);
        Rgb(
            scale_channel(self.0, f),
            scale_channel(self.1, f),
            scale_channel(self.2, f),
        )
    }

    /// Additive blend, the terminal stand-in for a "lighter" composite.
    #[must_use]
    pub fn add(self, other: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        Rgb(
            add_channel(self.0, other.0, a),
            add_channel(self.1, other.1, a),
            add_channel(self.2, other.2, a),
        )
    }
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        Color::Rgb(value.0, value.1, value.2)
    }
}

#[must_use]
pub fn lerp(start: f64, end: f64, amount: f64) -> f64 {
    (1.0 - amount) * start + amount * end
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(a: u8, b: u8, amount: f64) -> u8 {
    lerp(f64::from(a), f64::from(b), amount)
        .round()
        .clamp(0.0, 255.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_channel(c: u8, factor: f32) -> u8 {
    (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn add_channel(a: u8, b: u8, alpha: f32) -> u8 {
    (f32::from(a) + f32::from(b) * alpha)
        .round()
        .clamp(0.0, 255.0) as u8
}
