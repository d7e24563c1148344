use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use rand::Rng;
use rand::seq::IteratorRandom;

use super::clouds::CloudSystem;
use super::geom::Point;
use super::theme::Theme;
use super::{FrameContext, frame_chance};

const BOTTOM_OVERSHOOT: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LightningBolt {
    path: Vec<Point>,
    angle: f32,
    speed: f32,
    life: f32,
    depth: u8,
    branches: Vec<LightningBolt>,
    generated: bool,
}

impl LightningBolt {
    pub fn new(origin: Point, angle: f32, depth: u8, rng: &mut impl Rng) -> Self {
        Self {
            path: vec![origin],
            angle,
            speed: rng.random::<f32>() * 20.0 + 15.0,
            life: 1.0,
            depth,
            branches: Vec::new(),
            generated: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    #[must_use]
    pub fn branches(&self) -> &[LightningBolt] {
        &self.branches
    }

    #[must_use]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[must_use]
    pub fn life(&self) -> f32 {
        self.life
    }

    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Line width in scene units, thinner for branches.
    #[must_use]
    pub fn stroke_width(&self) -> f32 {
        if self.depth > 0 { 1.5 } else { 3.0 }
    }

    #[must_use]
    pub fn glow_radius(&self) -> f32 {
        if self.depth > 0 { 10.0 } else { 20.0 }
    }

    /// Deepest level of branching below and including this bolt.
    #[must_use]
    pub fn max_depth(&self) -> u8 {
        self.branches
            .iter()
            .map(LightningBolt::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    /// Grows one segment, or forwards to the branches once this bolt is done.
    fn extend(&mut self, floor: f32, ctx: &FrameContext<'_>, rng: &mut impl Rng) {
        if self.generated {
            for branch in &mut self.branches {
                branch.extend(floor, ctx, rng);
            }
            return;
        }
        let Some(&last) = self.path.last() else {
            self.generated = true;
            return;
        };
        let next = Point::new(
            last.x + self.angle.cos() * self.speed,
            last.y + self.angle.sin() * self.speed,
        );
        if next.y > floor || self.path.len() >= ctx.tuning.lightning_max_steps {
            self.generated = true;
            return;
        }
        self.path.push(next);
        self.angle += (rng.random::<f32>() - 0.5) * 0.8;
        if self.depth < ctx.tuning.lightning_max_depth
            && rng.random_bool(f64::from(ctx.tuning.lightning_branch_chance))
        {
            let turn = if rng.random_bool(0.5) { FRAC_PI_3 } else { -FRAC_PI_3 };
            self.branches
                .push(LightningBolt::new(next, self.angle + turn, self.depth + 1, rng));
        }
    }

    /// Visits every stroke of the tree with the trunk's opacity.
    pub fn for_each_stroke(&self, visit: &mut impl FnMut(&LightningBolt, f32)) {
        self.visit_with(self.life, visit);
    }

    fn visit_with(&self, life: f32, visit: &mut impl FnMut(&LightningBolt, f32)) {
        visit(self, life);
        for branch in &self.branches {
            branch.visit_with(life, visit);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LightningSystem {
    bolts: Vec<LightningBolt>,
    pending_frames: f32,
}

impl LightningSystem {
    #[must_use]
    pub fn bolts(&self) -> &[LightningBolt] {
        &self.bolts
    }

    pub fn clear(&mut self) {
        self.bolts.clear();
        self.pending_frames = 0.0;
    }

    pub fn push(&mut self, bolt: LightningBolt) {
        self.bolts.push(bolt);
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, clouds: &CloudSystem, rng: &mut impl Rng) {
        if ctx.theme == Theme::Thunderstorm
            && self.bolts.is_empty()
            && rng.random_bool(frame_chance(ctx.tuning.lightning_chance, ctx.step))
            && let Some(cloud) = clouds.heavy().choose(rng)
        {
            let origin = Point::new(cloud.x, cloud.y);
            log::debug!("lightning strike from ({:.0}, {:.0})", origin.x, origin.y);
            self.bolts.push(LightningBolt::new(origin, FRAC_PI_2, 0, rng));
        }

        let floor = ctx.viewport.height + BOTTOM_OVERSHOOT;
        self.pending_frames += ctx.step;
        while self.pending_frames >= 1.0 {
            self.pending_frames -= 1.0;
            for bolt in &mut self.bolts {
                bolt.extend(floor, ctx, rng);
            }
        }
        for bolt in self.bolts.iter_mut().filter(|bolt| bolt.generated) {
            bolt.life -= ctx.tuning.lightning_decay * ctx.step;
        }
        self.bolts.retain(|bolt| bolt.life > 0.0);
    }
}
