//! Heater-driven effects: flames, smoke and steam, soot that sticks to the
//! pointer, rain dousing and the radiant glow on the card.

use std::f32::consts::TAU;

use rand::Rng;

use super::FrameContext;
use super::geom::Point;
use super::pointer::ShakeSampler;
use super::precipitation::PrecipitationSystem;
use super::tuning::SceneTuning;

const FLAME_SHRINK: f32 = 0.95;
const SMOKE_GROWTH: f32 = 0.1;
const SOOT_GRAVITY: f32 = 0.1;
const GLOW_ANCHOR_BELOW: f32 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Flame {
    pub position: Point,
    pub size: f32,
    pub life: f32,
    vx: f32,
    vy: f32,
    decay: f32,
}

impl Flame {
    fn new(position: Point, rng: &mut impl Rng) -> Self {
        Self {
            position,
            size: rng.random::<f32>() * 20.0 + 10.0,
            life: 1.0,
            vx: rng.random::<f32>() * 2.0 - 1.0,
            vy: rng.random::<f32>() * 2.0 + 1.0,
            decay: rng.random::<f32>() * 0.03 + 0.02,
        }
    }

    fn burst(position: Point, rng: &mut impl Rng) -> Self {
        let mut flame = Self::new(position, rng);
        flame.vy = rng.random::<f32>() * 5.0 + 4.0;
        flame.size = rng.random::<f32>() * 30.0 + 20.0;
        flame.decay = rng.random::<f32>() * 0.05 + 0.04;
        flame
    }

    fn update(&mut self, step: f32) {
        self.life -= self.decay * step;
        self.position.x += self.vx * step;
        self.position.y -= self.vy * step;
        self.size *= FLAME_SHRINK.powf(step);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuffKind {
    Smoke,
    Steam,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Puff {
    pub position: Point,
    pub size: f32,
    pub life: f32,
    pub rotation: f32,
    pub kind: PuffKind,
    vx: f32,
    vy: f32,
    decay: f32,
    rotation_speed: f32,
}

impl Puff {
    fn smoke(position: Point, rng: &mut impl Rng) -> Self {
        Self {
            position,
            size: rng.random::<f32>() * 10.0 + 5.0,
            life: 1.0,
            rotation: rng.random::<f32>() * TAU,
            kind: PuffKind::Smoke,
            vx: rng.random::<f32>() - 0.5,
            vy: rng.random::<f32>() * 0.5 + 0.5,
            decay: rng.random::<f32>() * 0.01 + 0.005,
            rotation_speed: (rng.random::<f32>() - 0.5) * 0.01,
        }
    }

    fn steam(position: Point, rng: &mut impl Rng) -> Self {
        let mut puff = Self::smoke(position, rng);
        puff.kind = PuffKind::Steam;
        puff.vy = rng.random::<f32>() * 1.5 + 1.0;
        puff.decay = rng.random::<f32>() * 0.02 + 0.01;
        puff
    }

    /// Peak opacity: steam is brighter and more opaque than smoke.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        match self.kind {
            PuffKind::Smoke => self.life * 0.4,
            PuffKind::Steam => self.life * 0.6,
        }
    }

    fn update(&mut self, step: f32) {
        self.life -= self.decay * step;
        self.position.x += self.vx * step;
        self.position.y -= self.vy * step;
        self.size += SMOKE_GROWTH * step;
        self.rotation += self.rotation_speed * step;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Soot {
    pub position: Point,
    pub size: f32,
    pub stuck: bool,
    offset: Point,
    gravity: f32,
}

impl Soot {
    fn new(pointer: Point, rng: &mut impl Rng) -> Self {
        let offset = Point::new(
            (rng.random::<f32>() - 0.5) * 20.0,
            (rng.random::<f32>() - 0.5) * 20.0,
        );
        Self {
            position: Point::new(pointer.x + offset.x, pointer.y + offset.y),
            size: rng.random::<f32>() * 4.0 + 2.0,
            stuck: true,
            offset,
            gravity: 0.0,
        }
    }
}

/// Radiant heat spot on the card, in card-relative coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CardGlow {
    pub anchor: Point,
    pub intensity: f32,
    last: Option<Point>,
}

impl CardGlow {
    #[must_use]
    pub fn radius(&self) -> f32 {
        20.0 + 60.0 * self.intensity
    }

    /// `card_pointer` is `Some` only while the heater is on over the card.
    pub fn update(&mut self, card_pointer: Option<Point>, step: f32, tuning: &SceneTuning) {
        let Some(pointer) = card_pointer else {
            self.intensity = (self.intensity - tuning.glow_decay * step).max(0.0);
            self.last = None;
            return;
        };
        let still = self
            .last
            .is_some_and(|last| pointer.distance(last) < tuning.glow_still_distance);
        if still {
            self.intensity = (self.intensity + tuning.glow_ramp * step).min(1.0);
            if self.intensity < GLOW_ANCHOR_BELOW {
                self.anchor = pointer;
            }
        } else {
            self.intensity = (self.intensity - tuning.glow_decay * step).max(0.0);
        }
        self.last = Some(pointer);
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeatSystem {
    flames: Vec<Flame>,
    puffs: Vec<Puff>,
    soot: Vec<Soot>,
    glow: CardGlow,
    burnt: bool,
    heater_started_ms: Option<f64>,
    last_smoke_ms: f64,
    last_soot_ms: f64,
    douse: f32,
    fire_frames: f32,
    shake: ShakeSampler,
}

impl HeatSystem {
    #[must_use]
    pub fn flames(&self) -> &[Flame] {
        &self.flames
    }

    #[must_use]
    pub fn puffs(&self) -> &[Puff] {
        &self.puffs
    }

    #[must_use]
    pub fn soot(&self) -> &[Soot] {
        &self.soot
    }

    #[must_use]
    pub fn glow(&self) -> &CardGlow {
        &self.glow
    }

    #[must_use]
    pub fn is_burnt(&self) -> bool {
        self.burnt
    }

    #[must_use]
    pub fn douse_level(&self) -> f32 {
        self.douse
    }

    pub fn heater_on(&mut self, pointer: Option<Point>, now_ms: f64, tuning: &SceneTuning, rng: &mut impl Rng) {
        self.heater_started_ms = Some(now_ms);
        if let Some(pointer) = pointer {
            for _ in 0..tuning.heater_start_smoke {
                self.puffs.push(Puff::smoke(pointer, rng));
            }
        }
    }

    pub fn heater_off(&mut self) {
        self.heater_started_ms = None;
        self.douse = 0.0;
        self.fire_frames = 0.0;
    }

    pub fn flame_burst(&mut self, pointer: Point, tuning: &SceneTuning, rng: &mut impl Rng) {
        log::debug!("flame burst at ({:.0}, {:.0})", pointer.x, pointer.y);
        for _ in 0..tuning.flame_burst_count {
            self.flames.push(Flame::burst(pointer, rng));
        }
    }

    pub fn update_glow(&mut self, ctx: &FrameContext<'_>) {
        let over_card = ctx.tools.heater && ctx.pointer.is_over(&ctx.card);
        let card_pointer = if over_card { ctx.pointer.card() } else { None };
        self.glow.update(card_pointer, ctx.step, ctx.tuning);
    }

    /// Continuous flames at the pointer plus a smoke puff every interval.
    pub fn emit(&mut self, ctx: &FrameContext<'_>, rng: &mut impl Rng) {
        let Some(pointer) = ctx.pointer.screen().filter(|_| ctx.tools.heater) else {
            return;
        };
        self.fire_frames += ctx.step;
        while self.fire_frames >= 1.0 {
            self.fire_frames -= 1.0;
            for _ in 0..ctx.tuning.fire_per_frame {
                self.flames.push(Flame::new(pointer, rng));
            }
        }
        if ctx.now_ms - self.last_smoke_ms > ctx.tuning.smoke_interval_ms {
            let origin = Point::new(
                pointer.x + (rng.random::<f32>() - 0.5) * 10.0,
                pointer.y - 15.0,
            );
            self.puffs.push(Puff::smoke(origin, rng));
            self.last_smoke_ms = ctx.now_ms;
        }
    }

    /// Builds soot while heating and knocks it loose on rain or a shake.
    pub fn update_soot_state(
        &mut self,
        ctx: &FrameContext<'_>,
        precipitation: &PrecipitationSystem,
        rng: &mut impl Rng,
    ) {
        let tuning = ctx.tuning;
        let pointer = ctx.pointer.screen();

        if ctx.tools.heater
            && !self.burnt
            && let (Some(started), Some(pointer)) = (self.heater_started_ms, pointer)
            && ctx.now_ms - started > tuning.soot_delay_ms
            && ctx.now_ms - self.last_soot_ms > tuning.soot_interval_ms
            && rng.random_bool(f64::from(tuning.soot_chance))
        {
            if self.soot.len() < tuning.soot_cap {
                self.soot.push(Soot::new(pointer, rng));
            } else {
                log::info!("pointer burnt after {} soot flakes", self.soot.len());
                self.burnt = true;
            }
            self.last_soot_ms = ctx.now_ms;
        }

        let Some(pointer) = pointer else {
            return;
        };
        if self.soot.is_empty() {
            return;
        }
        let mut cleaned = ctx.theme.is_wet()
            && precipitation
                .near(pointer, tuning.soot_rain_radius)
                .filter(|p| p.is_rain())
                .count()
                >= tuning.soot_rain_hits;
        if !cleaned {
            cleaned = self.shake.sample(
                pointer,
                ctx.now_ms,
                tuning.shake_sample_ms,
                tuning.shake_threshold,
            );
        }
        if cleaned {
            for flake in &mut self.soot {
                flake.stuck = false;
            }
            self.burnt = false;
        }
    }

    /// Rain hitting the flame raises the douse level; returns true once the
    /// heater has been put out and should switch off.
    pub fn extinguish(
        &mut self,
        ctx: &FrameContext<'_>,
        precipitation: &mut PrecipitationSystem,
        rng: &mut impl Rng,
    ) -> bool {
        let tuning = ctx.tuning;
        if !ctx.tools.heater {
            self.douse = 0.0;
            return false;
        }
        let decay = tuning.douse_base_decay + f32::from(ctx.theme.warmth()) * tuning.douse_warmth_decay;
        self.douse = (self.douse - decay * ctx.step).max(0.0);

        let Some(pointer) = ctx.pointer.screen() else {
            return false;
        };
        if !ctx.theme.is_wet() {
            return false;
        }

        let hits = precipitation.remove_near(pointer, tuning.douse_radius, |p| p.is_rain() || p.is_drip());
        for hit in hits {
            if hit.is_rain() {
                self.douse += tuning.douse_per_drop;
                self.puffs.push(Puff::smoke(hit.position, rng));
            } else {
                self.puffs.push(Puff::steam(hit.position, rng));
            }
        }

        if self.douse >= tuning.douse_threshold {
            log::info!("heater doused at level {:.1}", self.douse);
            for _ in 0..tuning.steam_burst_count {
                self.puffs.push(Puff::steam(pointer, rng));
            }
            return true;
        }
        false
    }

    pub fn update_fire(&mut self, step: f32) {
        for flame in &mut self.flames {
            flame.update(step);
        }
        self.flames.retain(|f| f.life > 0.0);
        for puff in &mut self.puffs {
            puff.update(step);
        }
        self.puffs.retain(|p| p.life > 0.0);
    }

    pub fn update_soot(&mut self, ctx: &FrameContext<'_>) {
        let pointer = ctx.pointer.screen();
        let tuning = ctx.tuning;
        for flake in &mut self.soot {
            if flake.stuck {
                if let Some(pointer) = pointer {
                    flake.position = Point::new(pointer.x + flake.offset.x, pointer.y + flake.offset.y);
                }
                continue;
            }
            if let Some(pointer) = pointer.filter(|_| ctx.tools.umbrella) {
                let dx = pointer.x - flake.position.x;
                let distance = flake.position.distance(pointer);
                if distance > 0.0 && distance < tuning.umbrella_radius {
                    let force = (tuning.umbrella_radius - distance) / tuning.umbrella_radius;
                    flake.position.x -= dx / distance * force * tuning.umbrella_soot_push;
                }
            }
            flake.gravity += SOOT_GRAVITY * ctx.step;
            flake.position.y += flake.gravity * ctx.step;
        }
        let floor = ctx.viewport.height;
        self.soot.retain(|s| s.position.y <= floor + s.size);
    }

    pub fn steam_count(&self) -> usize {
        self.puffs.iter().filter(|p| p.kind == PuffKind::Steam).count()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::scene::geom::{CardRect, Viewport};
    use crate::scene::pointer::Pointer;
    use crate::scene::precipitation::Particle;
    use crate::scene::theme::Theme;
    use crate::scene::tools::Tools;

    fn context(tuning: &SceneTuning, theme: Theme) -> FrameContext<'_> {
        let card = CardRect::new(200.0, 150.0, 400.0, 300.0);
        let mut pointer = Pointer::default();
        pointer.move_to(Point::new(300.0, 100.0), &card);
        FrameContext {
            step: 1.0,
            now_ms: 0.0,
            theme,
            time_transitioning: false,
            pointer,
            tools: Tools {
                heater: true,
                ..Tools::default()
            },
            viewport: Viewport::new(800.0, 600.0),
            card,
            tuning,
        }
    }

    #[test]
    fn flames_shrink_and_burn_out() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Sunny);
        let mut rng = StdRng::seed_from_u64(41);
        let mut heat = HeatSystem::default();
        heat.emit(&ctx, &mut rng);
        assert_eq!(heat.flames().len(), 3);
        let size = heat.flames()[0].size;
        heat.update_fire(1.0);
        assert!(heat.flames()[0].size < size);
        for _ in 0..60 {
            heat.update_fire(1.0);
        }
        assert!(heat.flames().is_empty());
    }

    #[test]
    fn rain_on_the_flame_puts_it_out() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Rainy);
        let mut rng = StdRng::seed_from_u64(42);
        let mut heat = HeatSystem::default();
        let mut rain = PrecipitationSystem::default();

        let mut doused = false;
        for _ in 0..20 {
            for _ in 0..2 {
                rain.push(Particle::rain(Point::new(305.0, 100.0), &mut rng));
            }
            if heat.extinguish(&ctx, &mut rain, &mut rng) {
                doused = true;
                break;
            }
        }
        assert!(doused);
        assert_eq!(heat.steam_count(), tuning.steam_burst_count);
        assert!(rain.is_empty());
    }

    #[test]
    fn dry_weather_only_decays_douse() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Sunny);
        let mut rng = StdRng::seed_from_u64(43);
        let mut heat = HeatSystem::default();
        let mut rain = PrecipitationSystem::default();
        rain.push(Particle::rain(Point::new(305.0, 100.0), &mut rng));
        assert!(!heat.extinguish(&ctx, &mut rain, &mut rng));
        assert_eq!(rain.len(), 1);
        assert!(heat.douse_level().abs() < f32::EPSILON);
    }

    #[test]
    fn soot_waits_for_heating_delay() {
        let tuning = SceneTuning {
            soot_chance: 1.0,
            ..SceneTuning::default()
        };
        let mut ctx = context(&tuning, Theme::Sunny);
        let mut rng = StdRng::seed_from_u64(44);
        let mut heat = HeatSystem::default();
        let rain = PrecipitationSystem::default();
        heat.heater_on(None, 0.0, &tuning, &mut rng);

        ctx.now_ms = 1_000.0;
        heat.update_soot_state(&ctx, &rain, &mut rng);
        assert!(heat.soot().is_empty());

        ctx.now_ms = 1_600.0;
        heat.update_soot_state(&ctx, &rain, &mut rng);
        assert_eq!(heat.soot().len(), 1);
        assert!(heat.soot()[0].stuck);
    }

    #[test]
    fn soot_cap_burns_the_pointer_and_shaking_cleans_it() {
        let tuning = SceneTuning {
            soot_chance: 1.0,
            soot_cap: 2,
            ..SceneTuning::default()
        };
        let mut ctx = context(&tuning, Theme::Sunny);
        let mut rng = StdRng::seed_from_u64(45);
        let mut heat = HeatSystem::default();
        let rain = PrecipitationSystem::default();
        heat.heater_on(None, 0.0, &tuning, &mut rng);

        for tick in 0..4 {
            ctx.now_ms = 2_000.0 + f64::from(tick) * 200.0;
            heat.update_soot_state(&ctx, &rain, &mut rng);
        }
        assert!(heat.is_burnt());

        ctx.now_ms += 60.0;
        ctx.pointer.move_to(Point::new(700.0, 500.0), &ctx.card);
        heat.update_soot_state(&ctx, &rain, &mut rng);
        assert!(!heat.is_burnt());
        assert!(heat.soot().iter().all(|s| !s.stuck));
    }

    #[test]
    fn loose_soot_falls_off_screen() {
        let tuning = SceneTuning::default();
        let ctx = context(&tuning, Theme::Sunny);
        let mut rng = StdRng::seed_from_u64(46);
        let mut heat = HeatSystem::default();
        let mut flake = Soot::new(Point::new(300.0, 100.0), &mut rng);
        flake.stuck = false;
        heat.soot.push(flake);
        for _ in 0..200 {
            heat.update_soot(&ctx);
        }
        assert!(heat.soot().is_empty());
    }

    #[test]
    fn glow_ramps_while_still_and_decays_when_moving() {
        let tuning = SceneTuning::default();
        let mut glow = CardGlow::default();
        let spot = Point::new(50.0, 50.0);
        for _ in 0..100 {
            glow.update(Some(spot), 1.0, &tuning);
        }
        assert!((glow.intensity - 0.495).abs() < 1e-3);
        assert_eq!(glow.anchor, spot);

        glow.update(Some(Point::new(90.0, 50.0)), 1.0, &tuning);
        assert!((glow.intensity - 0.485).abs() < 1e-3);
        glow.update(None, 1.0, &tuning);
        assert!((glow.intensity - 0.475).abs() < 1e-3);
    }
}
