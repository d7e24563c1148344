use std::f64::consts::{PI, TAU};

use rand::Rng;

use super::clock::wrap_day;
use super::color::Rgb;
use super::geom::{Point, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyColors {
    pub top: Rgb,
    pub bottom: Rgb,
}

#[derive(Debug, Clone, Copy)]
pub struct SkyStop {
    pub time: f64,
    pub colors: SkyColors,
}

const fn stop(time: f64, top: u32, bottom: u32) -> SkyStop {
    SkyStop {
        time,
        colors: SkyColors {
            top: Rgb::hex(top),
            bottom: Rgb::hex(bottom),
        },
    }
}

/// One day of sky gradients; the first and last stops coincide at midnight.
pub const SKY_STOPS: [SkyStop; 13] = [
    stop(0.0, 0x0f1018, 0x242b3e),  // midnight
    stop(0.20, 0x0f1018, 0x242b3e), // end of night
    stop(0.22, 0x1c2a49, 0x4a5a7b), // astronomical twilight
    stop(0.25, 0x4a85d3, 0x73628a), // nautical twilight
    stop(0.28, 0x4a85d3, 0xf79d51), // civil twilight
    stop(0.42, 0x4a85d3, 0xaec9e8), // morning
    stop(0.5, 0x63a4ff, 0xa2c8f0),  // midday
    stop(0.58, 0x4a85d3, 0xaec9e8), // afternoon
    stop(0.68, 0x4a85d3, 0xf79d51), // sunset
    stop(0.75, 0x4a85d3, 0x73628a), // civil twilight
    stop(0.78, 0x1c2a49, 0x4a5a7b), // nautical twilight
    stop(0.81, 0x0f1018, 0x242b3e), // night
    stop(1.0, 0x0f1018, 0x242b3e),  // midnight
];

#[must_use]
pub fn sky_colors(time: f64) -> SkyColors {
    let t = wrap_day(time);
    let (prev, next) = SKY_STOPS
        .windows(2)
        .find(|pair| pair[1].time >= t)
        .map_or((SKY_STOPS[0], SKY_STOPS[SKY_STOPS.len() - 1]), |pair| {
            (pair[0], pair[1])
        });

    let span = next.time - prev.time;
    let progress = if span == 0.0 {
        0.0
    } else {
        (t - prev.time) / span
    };

    SkyColors {
        top: prev.colors.top.lerp(next.colors.top, progress),
        bottom: prev.colors.bottom.lerp(next.colors.bottom, progress),
    }
}

pub const SUN_SIZE: f32 = 50.0;
pub const MOON_SIZE: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Point,
    pub radius: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celestial {
    pub sun: Body,
    pub moon: Body,
    pub horizon_y: f32,
}

/// Sun and moon on opposite ends of a large ellipse centred below the screen.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn celestial_positions(time: f64, viewport: Viewport) -> Celestial {
    let w = f64::from(viewport.width);
    let h = f64::from(viewport.height);
    let center_x = w / 2.0;
    let center_y = h * 1.2;
    let radius_x = w / 2.0 + 100.0;
    let radius_y = h * 1.1;

    let angle = time * TAU + PI / 2.0;
    let place = |a: f64| {
        Point::new(
            (center_x + a.cos() * radius_x) as f32,
            (center_y + a.sin() * radius_y) as f32,
        )
    };

    let sun = place(angle);
    let moon = place(angle + PI);
    let horizon_y = center_y as f32;

    Celestial {
        sun: Body {
            position: sun,
            radius: SUN_SIZE * 1.5,
            visible: sun.y < horizon_y,
        },
        moon: Body {
            position: moon,
            radius: MOON_SIZE,
            visible: moon.y < horizon_y,
        },
        horizon_y,
    }
}

/// Speckled moon disc generated once and stamped every frame.
#[derive(Debug, Clone)]
pub struct MoonTexture {
    size: usize,
    cells: Vec<f32>,
}

impl MoonTexture {
    pub const CRATERS: usize = 50;

    pub fn generate(size: usize, rng: &mut impl Rng) -> Self {
        let mut cells = vec![0.0; size * size];
        let s = size as f32;
        let half = s / 2.0;
        for (idx, cell) in cells.iter_mut().enumerate() {
            let (x, y) = ((idx % size) as f32 + 0.5, (idx / size) as f32 + 0.5);
            if (x - half).hypot(y - half) <= half {
                *cell = 0.9;
            }
        }

        for _ in 0..Self::CRATERS {
            let cx = rng.random::<f32>() * s;
            let cy = rng.random::<f32>() * s;
            let r = rng.random::<f32>() * (s / 20.0) + 1.0;
            if (cx - half).hypot(cy - half) >= half - r {
                continue;
            }
            for (idx, cell) in cells.iter_mut().enumerate() {
                let (x, y) = ((idx % size) as f32 + 0.5, (idx / size) as f32 + 0.5);
                if (x - cx).hypot(y - cy) <= r {
                    *cell = 1.0;
                }
            }
        }

        Self { size, cells }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Brightness at normalised disc coordinates in `[-1, 1]`; zero outside the disc.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        if self.size == 0 || !(-1.0..=1.0).contains(&u) || !(-1.0..=1.0).contains(&v) {
            return 0.0;
        }
        let max = (self.size - 1) as f32;
        let x = (((u + 1.0) / 2.0) * max).round() as usize;
        let y = (((v + 1.0) / 2.0) * max).round() as usize;
        self.cells[y * self.size + x]
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn keyframe_times_return_exact_colors() {
        for stop in SKY_STOPS.iter().take(SKY_STOPS.len() - 1) {
            assert_eq!(sky_colors(stop.time), stop.colors, "t = {}", stop.time);
        }
    }

    #[test]
    fn keyframe_table_snapshot_at_dawn() {
        insta::assert_debug_snapshot!(sky_colors(0.28), @r"
        SkyColors {
            top: Rgb(
                74,
                133,
                211,
            ),
            bottom: Rgb(
                247,
                157,
                81,
            ),
        }
        ");
    }

    #[test]
    fn midpoint_between_stops_is_between_neighbours() {
        let colors = sky_colors(0.46);
        let morning = SKY_STOPS[5].colors.top;
        let midday = SKY_STOPS[6].colors.top;
        assert!(colors.top.0 > morning.0 && colors.top.0 < midday.0);
        assert!(colors.top.2 > morning.2 && colors.top.2 < midday.2);
    }

    #[test]
    fn sky_wraps_at_midnight() {
        assert_eq!(sky_colors(1.0), sky_colors(0.0));
        assert_eq!(sky_colors(-0.5), sky_colors(0.5));
    }

    #[test]
    fn sun_is_up_at_noon_and_moon_at_midnight() {
        let viewport = Viewport::new(800.0, 600.0);
        let noon = celestial_positions(0.5, viewport);
        assert!(noon.sun.visible);
        assert!(!noon.moon.visible);
        assert!((noon.sun.position.x - 400.0).abs() < 1e-3);

        let midnight = celestial_positions(0.0, viewport);
        assert!(!midnight.sun.visible);
        assert!(midnight.moon.visible);
    }

    #[test]
    fn moon_is_antipodal_to_sun() {
        let viewport = Viewport::new(800.0, 600.0);
        let c = celestial_positions(0.37, viewport);
        let mid_x = (c.sun.position.x + c.moon.position.x) / 2.0;
        let mid_y = (c.sun.position.y + c.moon.position.y) / 2.0;
        assert!((mid_x - 400.0).abs() < 1e-2);
        assert!((mid_y - c.horizon_y).abs() < 1e-2);
    }

    #[test]
    fn moon_texture_is_lit_inside_and_dark_outside() {
        let mut rng = StdRng::seed_from_u64(7);
        let texture = MoonTexture::generate(32, &mut rng);
        assert!(texture.sample(0.0, 0.0) > 0.0);
        assert!(texture.sample(0.99, 0.99).abs() < f32::EPSILON);
        assert!(texture.sample(1.5, 0.0).abs() < f32::EPSILON);
    }
}
