use rand::Rng;

use super::clock::{TimeOfDay, wrap_day};
use super::color::lerp;
use super::geom::{Point, Viewport};
use super::{FrameContext, frame_chance};

const MIN_TWINKLE_ALPHA: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub position: Point,
    pub radius: f32,
    pub alpha: f32,
    initial_alpha: f32,
    twinkle_speed: f32,
}

impl Star {
    fn new(viewport: Viewport, rng: &mut impl Rng) -> Self {
        let initial_alpha = rng.random::<f32>() * 0.5 + 0.5;
        Self {
            position: Point::new(
                rng.random::<f32>() * viewport.width,
                rng.random::<f32>() * viewport.height,
            ),
            radius: rng.random::<f32>() * 1.5,
            alpha: rng.random::<f32>() * initial_alpha,
            initial_alpha,
            twinkle_speed: (rng.random::<f32>() - 0.5) * 0.015,
        }
    }

    fn twinkle(&mut self, step: f32) {
        self.alpha += self.twinkle_speed * step;
        if self.alpha > self.initial_alpha || self.alpha < MIN_TWINKLE_ALPHA {
            self.twinkle_speed = -self.twinkle_speed;
            self.alpha = self.alpha.min(self.initial_alpha).max(MIN_TWINKLE_ALPHA);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub head: Point,
    pub length: f32,
    speed: f32,
}

impl ShootingStar {
    fn new(viewport: Viewport, rng: &mut impl Rng) -> Self {
        Self {
            head: Point::new(rng.random::<f32>() * viewport.width * 1.5, -20.0),
            length: rng.random::<f32>() * 80.0 + 10.0,
            speed: rng.random::<f32>() * 10.0 + 6.0,
        }
    }

    /// Advances down-left; false once the streak has left the screen.
    fn advance(&mut self, step: f32, viewport: Viewport) -> bool {
        self.head.x -= self.speed * step;
        self.head.y += self.speed * step;
        self.head.x >= -self.length && self.head.y <= viewport.height + self.length
    }

    #[must_use]
    pub fn tail(&self) -> Point {
        Point::new(self.head.x + self.length, self.head.y - self.length)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StarField {
    stars: Vec<Star>,
    shooting: Vec<ShootingStar>,
}

impl StarField {
    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    #[must_use]
    pub fn shooting_stars(&self) -> &[ShootingStar] {
        &self.shooting
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn populate(&mut self, count: usize, viewport: Viewport, rng: &mut impl Rng) {
        self.stars = (0..count).map(|_| Star::new(viewport, rng)).collect();
    }

    pub fn clear(&mut self) {
        self.stars.clear();
        self.shooting.clear();
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, night: bool, rng: &mut impl Rng) {
        for star in &mut self.stars {
            star.twinkle(ctx.step);
        }

        let tuning = ctx.tuning;
        if night
            && !ctx.time_transitioning
            && self.shooting.len() < tuning.shooting_star_cap
            && rng.random_bool(frame_chance(tuning.shooting_star_chance, ctx.step))
        {
            self.shooting.push(ShootingStar::new(ctx.viewport, rng));
        }
        self.shooting
            .retain_mut(|star| star.advance(ctx.step, ctx.viewport));
    }
}

/// Star visibility: 1 at night, 0 by day, cross-faded from the starting
/// side of a running time transition.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn star_visibility(time: &TimeOfDay, now_ms: f64) -> f32 {
    let settled = if time.is_night() { 1.0 } else { 0.0 };
    let Some(progress) = time.transition_progress(now_ms) else {
        return settled as f32;
    };
    let start = wrap_day(time.start());
    let start_alpha = if start < 0.29 || start > 0.71 { 1.0 } else { 0.0 };
    lerp(start_alpha, settled, progress) as f32
}
