use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use rand::Rng;

use super::geom::{CardRect, Point};
use super::theme::Theme;
use super::{FrameContext, frame_chance};

#[derive(Debug, Clone, PartialEq)]
pub struct FrostCrystal {
    path: Vec<Point>,
    angle: f32,
    speed: f32,
    life: f32,
    frozen: bool,
    auto_melt: f32,
    melt_budget: f32,
    drip_cooldown: f32,
}

impl FrostCrystal {
    pub fn new(origin: Point, angle: f32, rng: &mut impl Rng) -> Self {
        Self {
            path: vec![origin],
            angle,
            speed: rng.random::<f32>() * 0.3 + 0.1,
            life: 100.0 + rng.random::<f32>() * 150.0,
            frozen: true,
            auto_melt: 0.0,
            melt_budget: 0.0,
            drip_cooldown: 0.0,
        }
    }

    /// Starts on a random card edge, angled inwards.
    pub fn from_edge(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let (origin, angle) = match rng.random_range(0..4) {
            0 => (
                Point::new(0.0, rng.random::<f32>() * height),
                rng.random::<f32>() * FRAC_PI_2 - FRAC_PI_4,
            ),
            1 => (
                Point::new(width, rng.random::<f32>() * height),
                rng.random::<f32>() * FRAC_PI_2 + 3.0 * FRAC_PI_4,
            ),
            2 => (
                Point::new(rng.random::<f32>() * width, 0.0),
                rng.random::<f32>() * FRAC_PI_2 + FRAC_PI_4,
            ),
            _ => (
                Point::new(rng.random::<f32>() * width, height),
                rng.random::<f32>() * FRAC_PI_2 - PI - FRAC_PI_4,
            ),
        };
        Self::new(origin, angle, rng)
    }

    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    #[must_use]
    pub fn life(&self) -> f32 {
        self.life
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.life <= 0.0 && self.path.len() <= 1
    }

    fn tip(&self) -> Point {
        self.path.last().copied().unwrap_or_default()
    }
}

/// Frost lines growing over the weather card, in card coordinates.
#[derive(Debug, Clone, Default)]
pub struct FrostSystem {
    crystals: Vec<FrostCrystal>,
}

impl FrostSystem {
    #[must_use]
    pub fn crystals(&self) -> &[FrostCrystal] {
        &self.crystals
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.crystals.is_empty()
    }

    pub fn push(&mut self, crystal: FrostCrystal) {
        self.crystals.push(crystal);
    }

    /// Clears the card and seeds fresh crystals along its edges.
    pub fn regenerate(&mut self, count: usize, card: &CardRect, rng: &mut impl Rng) {
        self.crystals = (0..count)
            .map(|_| FrostCrystal::from_edge(card.width, card.height, rng))
            .collect();
    }

    /// Sets every crystal melting at `speed` points per frame.
    pub fn tag_auto_melt(&mut self, speed: f32) {
        for crystal in &mut self.crystals {
            crystal.auto_melt = speed;
        }
    }

    /// Grows or melts every crystal; returns screen positions of new drips.
    pub fn update(&mut self, ctx: &FrameContext<'_>, rng: &mut impl Rng) -> Vec<Point> {
        let tuning = ctx.tuning;
        let snowy = ctx.theme == Theme::Snowy;
        let heat_radius = tuning.frost_heat_radius
            * match ctx.theme {
                Theme::Sunny => 1.5,
                Theme::Cloudy => 1.2,
                _ => 1.0,
            };
        let heater_point = ctx.pointer.card().filter(|_| ctx.tools.heater);
        let drip_chance = frame_chance(tuning.frost_drip_chance, ctx.step);
        let mut drips = Vec::new();
        let mut branches = Vec::new();
        let existing = self.crystals.len();

        for crystal in &mut self.crystals {
            let tip = crystal.tip();
            let heated = heater_point.is_some_and(|p| tip.distance(p) < heat_radius);
            if crystal.frozen && (heated || crystal.auto_melt > 0.0) {
                crystal.frozen = false;
            }
            crystal.drip_cooldown = (crystal.drip_cooldown - ctx.step).max(0.0);

            if !crystal.frozen {
                if crystal.path.len() > 1 {
                    #[allow(clippy::cast_precision_loss)]
                    let rate = if ctx.tools.heater {
                        tuning.frost_heater_melt as f32
                    } else {
                        crystal.auto_melt
                    };
                    crystal.melt_budget += rate * ctx.step;
                    while crystal.melt_budget >= 1.0 && crystal.path.len() > 1 {
                        crystal.path.pop();
                        crystal.melt_budget -= 1.0;
                    }
                    if crystal.drip_cooldown <= 0.0 && rng.random_bool(drip_chance) {
                        drips.push(ctx.card.to_screen(crystal.tip()));
                        crystal.drip_cooldown = 30.0 + rng.random::<f32>() * 100.0;
                    }
                } else {
                    crystal.life = 0.0;
                }
            } else if snowy && crystal.life > 0.0 {
                let next = Point::new(
                    tip.x + crystal.angle.cos() * crystal.speed * ctx.step,
                    tip.y + crystal.angle.sin() * crystal.speed * ctx.step,
                );
                let inside = (0.0..=ctx.card.width).contains(&next.x)
                    && (0.0..=ctx.card.height).contains(&next.y);
                if !inside {
                    crystal.life = 0.0;
                    continue;
                }
                crystal.path.push(next);
                crystal.life -= ctx.step;
                crystal.angle += (rng.random::<f32>() - 0.5) * 0.6;
                if existing + branches.len() < tuning.frost_cap
                    && rng.random_bool(f64::from(tuning.frost_branch_chance))
                {
                    let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                    let turn = side * FRAC_PI_2 * (rng.random::<f32>() * 0.5 + 0.5);
                    branches.push(FrostCrystal::new(next, crystal.angle + turn, rng));
                }
            }
        }

        self.crystals.extend(branches);
        self.crystals.retain(|c| !c.is_spent());

        if snowy
            && self.crystals.len() < tuning.frost_cap
            && rng.random_bool(frame_chance(tuning.frost_seed_chance, ctx.step))
        {
            self.crystals
                .push(FrostCrystal::from_edge(ctx.card.width, ctx.card.height, rng));
        }
        drips
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::scene::geom::Viewport;
    use crate::scene::pointer::Pointer;
    use crate::scene::tools::Tools;
    use crate::scene::tuning::SceneTuning;

    fn context(tuning: &SceneTuning, theme: Theme) -> FrameContext<'_> {
        FrameContext {
            step: 1.0,
            now_ms: 0.0,
            theme,
            time_transitioning: false,
            pointer: Pointer::default(),
            tools: Tools::default(),
            viewport: Viewport::new(800.0, 600.0),
            card: CardRect::new(200.0, 150.0, 400.0, 300.0),
            tuning,
        }
    }

    #[test]
    fn regenerate_seeds_on_card_edges() {
        let mut rng = StdRng::seed_from_u64(51);
        let card = CardRect::new(0.0, 0.0, 400.0, 300.0);
        let mut frost = FrostSystem::default();
        frost.regenerate(25, &card, &mut rng);
        assert_eq!(frost.crystals().len(), 25);
        for crystal in frost.crystals() {
            let origin = crystal.path()[0];
            let on_edge = origin.x == 0.0 || origin.x == 400.0 || origin.y == 0.0 || origin.y == 300.0;
            assert!(on_edge, "{origin:?} is not on an edge");
        }
    }

    #[test]
    fn frozen_crystals_grow_while_snowy() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Snowy);
        let mut rng = StdRng::seed_from_u64(52);
        let mut frost = FrostSystem::default();
        frost.push(FrostCrystal::new(Point::new(200.0, 150.0), 0.0, &mut rng));
        frost.update(&ctx, &mut rng);
        assert_eq!(frost.crystals()[0].path().len(), 2);
    }

    #[test]
    fn crystals_do_not_grow_outside_snowy() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Misty);
        let mut rng = StdRng::seed_from_u64(53);
        let mut frost = FrostSystem::default();
        frost.push(FrostCrystal::new(Point::new(200.0, 150.0), 0.0, &mut rng));
        for _ in 0..10 {
            frost.update(&ctx, &mut rng);
        }
        assert_eq!(frost.crystals()[0].path().len(), 1);
    }

    #[test]
    fn auto_melt_shrinks_then_removes() {
        let tuning = SceneTuning {
            frost_seed_chance: 0.0,
            frost_branch_chance: 0.0,
            ..SceneTuning::default()
        };
        let snowy = context(&tuning, Theme::Snowy);
        let mut rng = StdRng::seed_from_u64(54);
        let mut frost = FrostSystem::default();
        let mut crystal = FrostCrystal::new(Point::new(200.0, 150.0), 0.0, &mut rng);
        crystal.life = 20.0;
        frost.push(crystal);
        for _ in 0..10 {
            frost.update(&snowy, &mut rng);
        }
        let grown = frost.crystals()[0].path().len();
        assert!(grown > 1);

        let sunny = context(&tuning, Theme::Sunny);
        frost.tag_auto_melt(3.0);
        let mut previous = grown;
        for _ in 0..10 {
            frost.update(&sunny, &mut rng);
            let Some(crystal) = frost.crystals().first() else {
                break;
            };
            assert!(!crystal.is_frozen());
            assert!(crystal.path().len() <= previous);
            previous = crystal.path().len();
        }
        assert!(frost.is_empty());
    }

    #[test]
    fn heater_melts_nearby_tip() {
        let tuning = SceneTuning::default();
        let mut ctx = context(&tuning, Theme::Snowy);
        ctx.tools.heater = true;
        ctx.pointer.move_to(Point::new(400.0, 300.0), &ctx.card);
        let mut rng = StdRng::seed_from_u64(55);
        let mut crystal = FrostCrystal::new(Point::new(195.0, 150.0), 0.0, &mut rng);
        crystal.path.extend((196..=200).map(|x| Point::new(x as f32, 150.0)));
        let mut frost = FrostSystem::default();
        frost.push(crystal);
        frost.update(&ctx, &mut rng);

        let crystal = &frost.crystals()[0];
        assert!(!crystal.is_frozen());
        assert_eq!(crystal.path().len(), 3);
    }
}
