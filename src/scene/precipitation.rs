use rand::Rng;
use rand::seq::IndexedRandom;

use super::clouds::CloudSystem;
use super::geom::Point;
use super::theme::{Theme, WeatherEffect};
use super::{FrameContext, frame_chance};

const RAIN_SIZE: f32 = 1.5;
const DRIP_SIZE: f32 = 2.0;
const DRIP_GRAVITY: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    Rain,
    Snow { heat_exposure: f32 },
    MeltDrip { gravity: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub life: f32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn rain(position: Point, rng: &mut impl Rng) -> Self {
        Self {
            position,
            vx: rng.random::<f32>() * 0.4 - 0.2,
            vy: rng.random::<f32>() * 5.0 + 5.0,
            size: RAIN_SIZE,
            life: 1.0,
            kind: ParticleKind::Rain,
        }
    }

    pub fn snow(position: Point, rng: &mut impl Rng) -> Self {
        Self {
            position,
            vx: rng.random::<f32>() * 0.5 - 0.25,
            vy: rng.random::<f32>() + 0.5,
            size: rng.random::<f32>() * 2.0 + 1.0,
            life: 1.0,
            kind: ParticleKind::Snow { heat_exposure: 0.0 },
        }
    }

    pub fn melt_drip(position: Point, rng: &mut impl Rng) -> Self {
        Self {
            position,
            vx: 0.0,
            vy: rng.random::<f32>() * 0.5 + 0.2,
            size: DRIP_SIZE,
            life: 1.0,
            kind: ParticleKind::MeltDrip {
                gravity: DRIP_GRAVITY,
            },
        }
    }

    #[must_use]
    pub fn is_rain(&self) -> bool {
        matches!(self.kind, ParticleKind::Rain)
    }

    #[must_use]
    pub fn is_drip(&self) -> bool {
        matches!(self.kind, ParticleKind::MeltDrip { .. })
    }

    /// Snowflake radius after shrinking under heat, zero for other kinds.
    #[must_use]
    pub fn flake_radius(&self, melt_delay: f32) -> f32 {
        match self.kind {
            ParticleKind::Snow { heat_exposure } => self.size * (1.0 - heat_exposure / melt_delay),
            _ => 0.0,
        }
    }

    fn repel(&mut self, from: Point, radius: f32, strength: f32) {
        let dx = self.position.x - from.x;
        let dy = self.position.y - from.y;
        let distance = dx.hypot(dy);
        if distance > 0.0 && distance < radius {
            let force = (radius - distance) / radius;
            self.position.x += dx / distance * force * strength;
            self.position.y += dy / distance * force * strength;
        }
    }
}

/// Shared pool of rain, snow and melt drips.
#[derive(Debug, Clone, Default)]
pub struct PrecipitationSystem {
    particles: Vec<Particle>,
    rain_frames: f32,
    last_snow_ms: f64,
}

impl PrecipitationSystem {
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn count(&self, filter: impl Fn(&Particle) -> bool) -> usize {
        self.particles.iter().filter(|p| filter(p)).count()
    }

    /// Live particles strictly closer than `radius` to `point`.
    pub fn near(&self, point: Point, radius: f32) -> impl Iterator<Item = &Particle> {
        self.particles
            .iter()
            .filter(move |p| p.life > 0.0 && p.position.distance(point) < radius)
    }

    /// Removes and returns the particles near `point` accepted by `filter`.
    pub fn remove_near(
        &mut self,
        point: Point,
        radius: f32,
        mut filter: impl FnMut(&Particle) -> bool,
    ) -> Vec<Particle> {
        let mut removed = Vec::new();
        self.particles.retain(|p| {
            if p.position.distance(point) < radius && filter(p) {
                removed.push(*p);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.rain_frames = 0.0;
    }

    /// Emits rain or snow from heavy cloud puffs for the active effect.
    pub fn spawn(
        &mut self,
        ctx: &FrameContext<'_>,
        effect: WeatherEffect,
        clouds: &CloudSystem,
        rng: &mut impl Rng,
    ) {
        if effect == WeatherEffect::None || ctx.time_transitioning {
            self.rain_frames = 0.0;
            return;
        }
        let sources: Vec<_> = clouds.spawn_sources().collect();
        if sources.is_empty() {
            return;
        }

        match effect {
            WeatherEffect::Rainy => {
                self.rain_frames += ctx.step;
                while self.rain_frames >= 1.0 {
                    self.rain_frames -= 1.0;
                    if !rng.random_bool(f64::from(ctx.tuning.rain_spawn_chance)) {
                        continue;
                    }
                    for _ in 0..ctx.tuning.rain_drops_per_frame {
                        if self.particles.len() >= ctx.tuning.rain_cap {
                            return;
                        }
                        let Some(cloud) = sources.choose(rng) else {
                            return;
                        };
                        let Some(puff) = cloud.puffs().choose(rng) else {
                            continue;
                        };
                        let position = Point::new(
                            cloud.x + puff.offset_x + (rng.random::<f32>() - 0.5) * puff.radius * 0.8,
                            cloud.y + puff.offset_y + puff.radius * 0.3,
                        );
                        self.particles.push(Particle::rain(position, rng));
                    }
                }
            }
            WeatherEffect::Snowy => {
                if self.particles.len() >= ctx.tuning.snow_cap
                    || ctx.now_ms - self.last_snow_ms <= ctx.tuning.snow_interval_ms
                {
                    return;
                }
                self.last_snow_ms = ctx.now_ms;
                let Some(cloud) = sources.choose(rng) else {
                    return;
                };
                let Some(puff) = cloud.puffs().choose(rng) else {
                    return;
                };
                let position = Point::new(
                    cloud.x + puff.offset_x + (rng.random::<f32>() - 0.5) * puff.radius,
                    cloud.y + puff.offset_y + puff.radius * 0.3,
                );
                self.particles.push(Particle::snow(position, rng));
            }
            WeatherEffect::None => {}
        }
    }

    /// Moves every particle, applies pointer and umbrella forces, melts
    /// snow and culls whatever fell off the bottom of the screen.
    pub fn update(&mut self, ctx: &FrameContext<'_>, rng: &mut impl Rng) {
        let tuning = ctx.tuning;
        let step = ctx.step;
        let pointer = ctx.pointer.screen();
        let warmth = ctx.theme.warmth();
        let melt_chance = if warmth > Theme::Snowy.warmth() {
            frame_chance(f32::from(warmth) / 3.0 * tuning.warm_melt_chance, step)
        } else {
            0.0
        };
        let mut drips = Vec::new();

        for particle in &mut self.particles {
            if let ParticleKind::MeltDrip { gravity } = particle.kind {
                particle.vy += gravity * step;
            }
            particle.position.x += particle.vx * step;
            particle.position.y += particle.vy * step;

            if let Some(pointer) = pointer {
                let multiplier = if particle.is_drip() {
                    tuning.drip_pointer_multiplier
                } else {
                    1.0
                };
                particle.repel(
                    pointer,
                    tuning.pointer_radius,
                    tuning.pointer_strength * multiplier,
                );
                if ctx.tools.umbrella {
                    particle.repel(pointer, tuning.umbrella_radius, tuning.umbrella_push);
                }
            }

            if particle.position.y > ctx.viewport.height + particle.size {
                particle.life = 0.0;
                continue;
            }

            if let ParticleKind::Snow { heat_exposure } = &mut particle.kind {
                let heated = ctx.tools.heater
                    && pointer.is_some_and(|p| {
                        particle.position.distance(p) < tuning.heater_melt_radius
                    });
                *heat_exposure = if heated {
                    *heat_exposure + step
                } else {
                    (*heat_exposure - step).max(0.0)
                };
                let melted = *heat_exposure > tuning.snow_melt_delay_frames
                    || (melt_chance > 0.0 && rng.random_bool(melt_chance));
                if melted {
                    drips.push(particle.position);
                    particle.life = 0.0;
                }
            }
        }

        self.particles.retain(|p| p.life > 0.0);
        for position in drips {
            self.particles.push(Particle::melt_drip(position, rng));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::scene::geom::{CardRect, Viewport};
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

    fn flake_at(position: Point) -> Particle {
        Particle {
            position,
            vx: 0.0,
            vy: 0.0,
            size: 2.0,
            life: 1.0,
            kind: ParticleKind::Snow { heat_exposure: 0.0 },
        }
    }

    #[test]
    fn heated_flake_becomes_exactly_one_drip() {
        let tuning = SceneTuning::default();
        let mut ctx = context(&tuning, Theme::Snowy);
        ctx.tools.heater = true;
        ctx.pointer.move_to(Point::new(400.0, 300.0), &ctx.card);
        let mut rng = StdRng::seed_from_u64(7);
        let mut system = PrecipitationSystem::default();
        system.push(flake_at(Point::new(420.0, 300.0)));

        for _ in 0..30 {
            system.update(&ctx, &mut rng);
            assert_eq!(system.count(|p| p.is_drip()), 0);
        }
        system.update(&ctx, &mut rng);

        assert_eq!(system.len(), 1);
        let drip = system.particles()[0];
        assert!(drip.is_drip());
        assert!(drip.position.distance(Point::new(400.0, 300.0)) <= 50.0);
    }

    #[test]
    fn heat_exposure_decays_away_from_heater() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Snowy);
        let mut rng = StdRng::seed_from_u64(8);
        let mut system = PrecipitationSystem::default();
        let mut flake = flake_at(Point::new(100.0, 100.0));
        flake.kind = ParticleKind::Snow { heat_exposure: 10.0 };
        system.push(flake);
        system.update(&ctx, &mut rng);
        assert_eq!(
            system.particles()[0].kind,
            ParticleKind::Snow { heat_exposure: 9.0 }
        );
    }

    #[test]
    fn particles_below_screen_are_culled() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Rainy);
        let mut rng = StdRng::seed_from_u64(9);
        let mut system = PrecipitationSystem::default();
        system.push(Particle::rain(Point::new(10.0, 599.0), &mut rng));
        system.update(&ctx, &mut rng);
        assert!(system.is_empty());
    }

    #[test]
    fn pointer_pushes_rain_aside() {
        let tuning = SceneTuning::default();
        let mut ctx = context(&tuning, Theme::Rainy);
        ctx.pointer.move_to(Point::new(100.0, 100.0), &ctx.card);
        let mut rng = StdRng::seed_from_u64(10);
        let mut system = PrecipitationSystem::default();
        let mut drop = Particle::rain(Point::new(90.0, 100.0), &mut rng);
        drop.vx = 0.0;
        drop.vy = 0.0;
        system.push(drop);
        system.update(&ctx, &mut rng);
        assert!(system.particles()[0].position.x < 90.0);
    }

    #[test]
    fn remove_near_only_takes_accepted_kinds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut system = PrecipitationSystem::default();
        let centre = Point::new(50.0, 50.0);
        system.push(Particle::rain(Point::new(55.0, 50.0), &mut rng));
        system.push(Particle::melt_drip(Point::new(45.0, 50.0), &mut rng));
        system.push(flake_at(Point::new(50.0, 55.0)));
        system.push(Particle::rain(Point::new(500.0, 50.0), &mut rng));

        assert_eq!(system.near(centre, 30.0).count(), 3);
        let removed = system.remove_near(centre, 30.0, |p| p.is_rain() || p.is_drip());
        assert_eq!(removed.len(), 2);
        assert_eq!(system.len(), 2);
    }

    #[test]
    fn no_spawning_without_effect() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Sunny);
        let mut rng = StdRng::seed_from_u64(12);
        let mut clouds = CloudSystem::default();
        clouds.retarget(Theme::Rainy, ctx.viewport, false, &mut rng);
        let mut system = PrecipitationSystem::default();
        for _ in 0..50 {
            system.spawn(&ctx, WeatherEffect::None, &clouds, &mut rng);
        }
        assert!(system.is_empty());
    }

    #[test]
    fn snow_respects_interval() {
        let tuning = SceneTuning::default();
        let mut ctx = context(&tuning, Theme::Snowy);
        let mut rng = StdRng::seed_from_u64(13);
        let mut clouds = CloudSystem::default();
        clouds.retarget(Theme::Snowy, ctx.viewport, false, &mut rng);
        let mut system = PrecipitationSystem::default();

        ctx.now_ms = 60.0;
        system.spawn(&ctx, WeatherEffect::Snowy, &clouds, &mut rng);
        ctx.now_ms = 90.0;
        system.spawn(&ctx, WeatherEffect::Snowy, &clouds, &mut rng);
        assert_eq!(system.len(), 1);
        ctx.now_ms = 120.0;
        system.spawn(&ctx, WeatherEffect::Snowy, &clouds, &mut rng);
        assert_eq!(system.len(), 2);
    }
}
