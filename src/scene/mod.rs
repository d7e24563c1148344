//! Deterministic weather scene simulation.
//!
//! A [`Scene`] owns every entity pool and advances them all in a fixed order
//! from [`Scene::tick`]. It never reads a wall clock: elapsed time is always
//! passed in, and randomness comes from a seeded generator, so identical
//! inputs reproduce identical frames.

pub mod clock;
pub mod clouds;
pub mod color;
pub mod frost;
pub mod geom;
pub mod heat;
pub mod lightning;
pub mod pointer;
pub mod precipitation;
pub mod sky;
pub mod stars;
pub mod theme;
pub mod tools;
pub mod tuning;

use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};

use self::clock::{ClockDrag, TimeOfDay};
use self::clouds::{CloudShade, CloudSystem, cloud_shade};
use self::frost::FrostSystem;
use self::geom::{CardRect, Point, Viewport};
use self::heat::HeatSystem;
use self::lightning::LightningSystem;
use self::pointer::Pointer;
use self::precipitation::{Particle, PrecipitationSystem};
use self::sky::{Celestial, MoonTexture, SkyColors, celestial_positions, sky_colors};
use self::stars::{StarField, star_visibility};
use self::theme::{Theme, ThemeState, WeatherEffect};
use self::tools::{SHADE_LAYERS, ShadeEllipse, Tool, Tools, umbrella_shade};
use self::tuning::SceneTuning;

/// Longest frame the simulation will integrate in one tick.
pub const MAX_FRAME: Duration = Duration::from_millis(250);
/// Reference frame rate the per-frame constants were tuned at.
pub const REFERENCE_FPS: f32 = 60.0;

const MOON_TEXTURE_SIZE: usize = 64;
const NOON: f64 = 0.5;
const MIDNIGHT: f64 = 0.0;

/// Read-only view of the frame handed to each subsystem.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Elapsed time in reference frames.
    pub step: f32,
    pub now_ms: f64,
    pub theme: Theme,
    pub time_transitioning: bool,
    pub pointer: Pointer,
    pub tools: Tools,
    pub viewport: Viewport,
    pub card: CardRect,
    pub tuning: &'a SceneTuning,
}

/// Probability of a per-frame chance firing at least once over `step` frames.
pub(crate) fn frame_chance(chance: f32, step: f32) -> f64 {
    let chance = f64::from(chance).clamp(0.0, 1.0);
    (1.0 - (1.0 - chance).powf(f64::from(step.max(0.0)))).clamp(0.0, 1.0)
}

/// How a theme change was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThemeChange {
    /// Skip the cross-fade.
    pub instant: bool,
    /// Local time at the reported location, as a fraction of a day.
    pub city_time: Option<f64>,
    /// A user override; locks automatic day/night flips.
    pub manual: bool,
}

impl ThemeChange {
    #[must_use]
    pub fn weather(city_time: f64) -> Self {
        Self {
            instant: false,
            city_time: Some(city_time),
            manual: false,
        }
    }

    #[must_use]
    pub fn manual(instant: bool) -> Self {
        Self {
            instant,
            city_time: None,
            manual: true,
        }
    }
}

pub struct Scene {
    tuning: SceneTuning,
    rng: StdRng,
    viewport: Viewport,
    card: CardRect,
    now_ms: f64,
    time: TimeOfDay,
    theme: ThemeState,
    effect: WeatherEffect,
    flame_burst_pending: bool,
    pointer: Pointer,
    tools: Tools,
    clock_drag: Option<ClockDrag>,
    celestial: Celestial,
    sun_anchor: Option<Point>,
    moon: MoonTexture,
    stars: StarField,
    clouds: CloudSystem,
    precipitation: PrecipitationSystem,
    lightning: LightningSystem,
    shade: Option<[ShadeEllipse; SHADE_LAYERS]>,
    heat: HeatSystem,
    frost: FrostSystem,
}

impl Scene {
    /// Builds a scene at `time_of_day`, sunny or night depending on the hour.
    pub fn new(
        viewport: Viewport,
        card: CardRect,
        tuning: SceneTuning,
        seed: u64,
        time_of_day: f64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let time = TimeOfDay::new(time_of_day);
        let initial = if time.is_night() {
            Theme::Night
        } else {
            Theme::Sunny
        };
        let moon = MoonTexture::generate(MOON_TEXTURE_SIZE, &mut rng);
        let mut clouds = CloudSystem::default();
        clouds.retarget(initial, viewport, false, &mut rng);
        log::debug!("scene created at {} with theme {initial}", time.hh_mm());

        Self {
            tuning,
            rng,
            viewport,
            card,
            now_ms: 0.0,
            celestial: celestial_positions(time.value(), viewport),
            time,
            theme: ThemeState::new(initial),
            effect: initial.effect(),
            flame_burst_pending: false,
            pointer: Pointer::default(),
            tools: Tools::default(),
            clock_drag: None,
            sun_anchor: None,
            moon,
            stars: StarField::default(),
            clouds,
            precipitation: PrecipitationSystem::default(),
            lightning: LightningSystem::default(),
            shade: None,
            heat: HeatSystem::default(),
            frost: FrostSystem::default(),
        }
    }

    /// Requests a theme, optionally steering the clock to a city's local time.
    pub fn set_theme(&mut self, theme: Theme, change: ThemeChange) {
        if let Some(city_time) = change.city_time.filter(|_| !change.manual) {
            self.time
                .set_target(city_time, self.tuning.time_transition_ms, self.now_ms);
        } else if change.manual && matches!(theme, Theme::Sunny | Theme::Night) {
            let target = if theme == Theme::Sunny { NOON } else { MIDNIGHT };
            if change.instant {
                self.time.set_instant(target);
            } else {
                self.time
                    .set_target(target, self.tuning.time_transition_ms, self.now_ms);
            }
        }

        if !change.manual && self.theme.current() == theme {
            return;
        }
        self.theme.set_locked(change.manual);
        self.enter_theme(theme, change.instant);
    }

    fn enter_theme(&mut self, theme: Theme, instant: bool) {
        let old = self.theme.current();
        log::info!("theme {old} -> {theme}{}", if instant { " (instant)" } else { "" });

        if self.tools.heater && theme.warmth() > old.warmth() {
            self.flame_burst_pending = true;
        }
        self.theme
            .begin(theme, instant, self.now_ms, self.tuning.theme_transition_ms);
        if !self.theme.is_transitioning() {
            self.finalize_theme();
        }

        if old == Theme::Snowy && theme != Theme::Snowy {
            let speed = match theme.warmth() {
                0 => 1,
                warmth => warmth,
            };
            self.frost.tag_auto_melt(f32::from(speed));
        } else if theme == Theme::Snowy && old != Theme::Snowy {
            self.frost
                .regenerate(self.tuning.frost_seed_count, &self.card, &mut self.rng);
        }

        self.clouds
            .retarget(theme, self.viewport, true, &mut self.rng);
    }

    fn finalize_theme(&mut self) {
        self.lightning.clear();
        self.effect = self.theme.current().effect();
        if self.flame_burst_pending {
            self.flame_burst_pending = false;
            if let Some(pointer) = self.pointer.screen().filter(|_| self.tools.heater) {
                self.heat.flame_burst(pointer, &self.tuning, &mut self.rng);
            }
        }
    }

    fn update_dynamic_theme(&mut self) {
        let night = self.time.is_night();
        if !self.theme.is_locked() && !self.time.is_transitioning() {
            match self.theme.current() {
                Theme::Sunny if night => self.enter_theme(Theme::Night, true),
                Theme::Night if !night => self.enter_theme(Theme::Sunny, true),
                _ => {}
            }
        }
        if night && self.stars.is_empty() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = (self.viewport.width * self.tuning.star_density) as usize;
            self.stars.populate(count, self.viewport, &mut self.rng);
        }
    }

    /// Advances the whole scene by `dt`, clamped to [`MAX_FRAME`].
    pub fn tick(&mut self, dt: Duration) {
        let dt = dt.min(MAX_FRAME);
        let step = dt.as_secs_f32() * REFERENCE_FPS;
        self.now_ms += dt.as_secs_f64() * 1_000.0;

        self.update_dynamic_theme();
        self.time.advance(self.now_ms);
        if self.theme.advance(self.now_ms) {
            self.finalize_theme();
        }

        self.celestial = celestial_positions(self.time.value(), self.viewport);
        if self.celestial.sun.visible {
            self.sun_anchor = Some(self.celestial.sun.position);
        }

        let ctx = FrameContext {
            step,
            now_ms: self.now_ms,
            theme: self.theme.current(),
            time_transitioning: self.time.is_transitioning(),
            pointer: self.pointer,
            tools: self.tools,
            viewport: self.viewport,
            card: self.card,
            tuning: &self.tuning,
        };

        self.stars.update(&ctx, self.time.is_night(), &mut self.rng);
        self.clouds.update(
            step,
            self.viewport,
            self.tuning.cloud_fade_in,
            self.tuning.cloud_fade_out,
        );

        self.precipitation.update(&ctx, &mut self.rng);
        self.precipitation
            .spawn(&ctx, self.effect, &self.clouds, &mut self.rng);
        self.lightning.update(&ctx, &self.clouds, &mut self.rng);

        self.shade = match (self.pointer.screen(), self.sun_anchor) {
            (Some(pointer), Some(sun))
                if self.tools.umbrella && !self.time.is_night() && sun.y <= self.viewport.height =>
            {
                Some(umbrella_shade(pointer, sun, self.viewport))
            }
            _ => None,
        };

        if ctx.theme == Theme::Snowy || !self.frost.is_empty() {
            for drip in self.frost.update(&ctx, &mut self.rng) {
                self.precipitation.push(Particle::melt_drip(drip, &mut self.rng));
            }
        }
        self.heat.update_glow(&ctx);

        self.heat.emit(&ctx, &mut self.rng);
        self.heat
            .update_soot_state(&ctx, &self.precipitation, &mut self.rng);
        let doused = self
            .heat
            .extinguish(&ctx, &mut self.precipitation, &mut self.rng);
        self.heat.update_fire(step);
        self.heat.update_soot(&ctx);

        if doused {
            self.toggle_tool(Tool::Heater);
        }
    }

    /// Flips a tool, returning its new state.
    pub fn toggle_tool(&mut self, tool: Tool) -> bool {
        let active = self.tools.toggle(tool);
        if tool == Tool::Heater {
            if active {
                self.heat.heater_on(
                    self.pointer.screen(),
                    self.now_ms,
                    &self.tuning,
                    &mut self.rng,
                );
            } else {
                self.heat.heater_off();
            }
        }
        log::info!("{} {}", tool.label(), if active { "on" } else { "off" });
        active
    }

    pub fn pointer_moved(&mut self, screen: Point) {
        self.pointer.move_to(screen, &self.card);
    }

    pub fn resize(&mut self, viewport: Viewport, card: CardRect) {
        if viewport != self.viewport {
            self.stars.clear();
        }
        self.viewport = viewport;
        self.card = card;
        self.pointer.reproject(&card);
        self.celestial = celestial_positions(self.time.value(), viewport);
    }

    /// Starts dragging the clock face; any time transition is abandoned.
    pub fn begin_clock_drag(&mut self) {
        self.time.cancel_transition();
        self.clock_drag = Some(ClockDrag::begin(self.time.value()));
    }

    /// Sets the time from a dial angle (radians clockwise from twelve).
    pub fn drag_clock(&mut self, angle: f64) {
        if let Some(drag) = self.clock_drag.as_mut() {
            let time = drag.update(angle);
            self.time.set_instant(time);
        }
    }

    pub fn end_clock_drag(&mut self) {
        self.clock_drag = None;
    }

    #[must_use]
    pub fn is_dragging_clock(&self) -> bool {
        self.clock_drag.is_some()
    }

    #[must_use]
    pub fn time(&self) -> &TimeOfDay {
        &self.time
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    #[must_use]
    pub fn effect(&self) -> WeatherEffect {
        self.effect
    }

    #[must_use]
    pub fn tools(&self) -> Tools {
        self.tools
    }

    #[must_use]
    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn card(&self) -> CardRect {
        self.card
    }

    #[must_use]
    pub fn tuning(&self) -> &SceneTuning {
        &self.tuning
    }

    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    #[must_use]
    pub fn sky(&self) -> SkyColors {
        sky_colors(self.time.value())
    }

    #[must_use]
    pub fn celestial(&self) -> &Celestial {
        &self.celestial
    }

    #[must_use]
    pub fn moon_texture(&self) -> &MoonTexture {
        &self.moon
    }

    #[must_use]
    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    #[must_use]
    pub fn star_visibility(&self) -> f32 {
        star_visibility(&self.time, self.now_ms)
    }

    #[must_use]
    pub fn clouds(&self) -> &CloudSystem {
        &self.clouds
    }

    /// Cloud colour for the current frame, cross-faded during a theme change.
    #[must_use]
    pub fn cloud_shade(&self, heavy: bool) -> CloudShade {
        let time = self.time.value();
        let current = cloud_shade(self.theme.current(), heavy, time);
        match self.theme.blend() {
            Some((previous, progress)) => cloud_shade(previous, heavy, time).blend(current, progress),
            None => current,
        }
    }

    #[must_use]
    pub fn precipitation(&self) -> &PrecipitationSystem {
        &self.precipitation
    }

    #[must_use]
    pub fn lightning(&self) -> &LightningSystem {
        &self.lightning
    }

    #[must_use]
    pub fn umbrella_shade(&self) -> Option<&[ShadeEllipse; SHADE_LAYERS]> {
        self.shade.as_ref()
    }

    #[must_use]
    pub fn heat(&self) -> &HeatSystem {
        &self.heat
    }

    #[must_use]
    pub fn frost(&self) -> &FrostSystem {
        &self.frost
    }
}
