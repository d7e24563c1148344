use rand::Rng;

use super::color::lerp;
use super::geom::Viewport;
use super::theme::Theme;

const WRAP_MARGIN: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Puff {
    pub offset_x: f32,
    pub offset_y: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    Steady,
    In,
    Out,
}

#[derive(Debug, Clone)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
    pub fade: Fade,
    speed: f32,
    heavy: bool,
    puffs: Vec<Puff>,
}

impl Cloud {
    pub fn new(
        rng: &mut impl Rng,
        viewport: Viewport,
        y: f32,
        heavy: bool,
        fade_in: bool,
    ) -> Self {
        let heavy_scale = if heavy { 1.5 } else { 1.0 };
        let speed = (rng.random::<f32>() * 0.3 + 0.2) * heavy_scale;
        let width = (rng.random::<f32>() * 200.0 + 150.0) * if heavy { 1.2 } else { 1.0 };
        let height = width * (rng.random::<f32>() * 0.3 + 0.4);
        let puff_count = rng.random_range(8..=12);
        let puffs = (0..puff_count)
            .map(|_| Puff {
                offset_x: (rng.random::<f32>() - 0.5) * width,
                offset_y: (rng.random::<f32>() - 0.5) * height,
                radius: (rng.random::<f32>() * 0.4 + 0.6) * (width / 3.5),
            })
            .collect();

        Self {
            x: if fade_in {
                -width
            } else {
                rng.random::<f32>() * viewport.width
            },
            y,
            alpha: if fade_in { 0.0 } else { 1.0 },
            fade: if fade_in { Fade::In } else { Fade::Steady },
            speed,
            heavy,
            puffs,
        }
    }

    #[must_use]
    pub fn is_heavy(&self) -> bool {
        self.heavy
    }

    #[must_use]
    pub fn puffs(&self) -> &[Puff] {
        &self.puffs
    }

    fn update(&mut self, step: f32, viewport: Viewport, fade_in: f32, fade_out: f32) {
        self.x += self.speed * step;
        match self.fade {
            Fade::In => {
                self.alpha = (self.alpha + fade_in * step).min(1.0);
                if self.alpha >= 1.0 {
                    self.fade = Fade::Steady;
                }
            }
            Fade::Out => self.alpha -= fade_out * step,
            Fade::Steady => {}
        }
        if self.x > viewport.width + WRAP_MARGIN {
            self.x = -WRAP_MARGIN;
        }
    }
}

/// `(light, heavy)` cloud population each theme settles on.
#[must_use]
pub fn cloud_targets(theme: Theme) -> (usize, usize) {
    match theme {
        Theme::Sunny => (8, 0),
        Theme::Night => (5, 0),
        Theme::Cloudy => (20, 15),
        Theme::Misty | Theme::Snowy => (15, 20),
        Theme::Rainy | Theme::Thunderstorm => (15, 25),
    }
}

#[derive(Debug, Clone, Default)]
pub struct CloudSystem {
    clouds: Vec<Cloud>,
}

impl CloudSystem {
    #[must_use]
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    #[must_use]
    pub fn count(&self, heavy: bool) -> usize {
        self.clouds.iter().filter(|c| c.heavy == heavy).count()
    }

    /// Heavy clouds opaque enough to rain or snow.
    pub fn spawn_sources(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter().filter(|c| c.heavy && c.alpha > 0.5)
    }

    pub fn heavy(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter().filter(|c| c.heavy)
    }

    pub fn push(&mut self, cloud: Cloud) {
        self.clouds.push(cloud);
    }

    /// Spawns clouds to cover a deficit and fades out any surplus.
    pub fn retarget(&mut self, theme: Theme, viewport: Viewport, fade_in: bool, rng: &mut impl Rng) {
        let (target_light, target_heavy) = cloud_targets(theme);
        let live = |heavy: bool, clouds: &[Cloud]| {
            clouds
                .iter()
                .filter(|c| c.heavy == heavy && c.fade != Fade::Out)
                .count()
        };
        let current_light = live(false, &self.clouds);
        let current_heavy = live(true, &self.clouds);

        for _ in current_light..target_light {
            let y = rng.random::<f32>() * viewport.height * 0.4;
            self.clouds.push(Cloud::new(rng, viewport, y, false, fade_in));
        }
        for _ in current_heavy..target_heavy {
            let y = rng.random::<f32>() * viewport.height * 0.3;
            self.clouds.push(Cloud::new(rng, viewport, y, true, fade_in));
        }

        let mut excess_light = current_light.saturating_sub(target_light);
        let mut excess_heavy = current_heavy.saturating_sub(target_heavy);
        for cloud in &mut self.clouds {
            if cloud.fade == Fade::Out {
                continue;
            }
            let excess = if cloud.heavy {
                &mut excess_heavy
            } else {
                &mut excess_light
            };
            if *excess > 0 {
                cloud.fade = Fade::Out;
                *excess -= 1;
            }
        }

        self.clouds.sort_by(|a, b| a.y.total_cmp(&b.y));
    }

    pub fn update(&mut self, step: f32, viewport: Viewport, fade_in: f32, fade_out: f32) {
        for cloud in &mut self.clouds {
            cloud.update(step, viewport, fade_in, fade_out);
        }
        self.clouds.retain(|c| c.alpha > 0.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudShade {
    pub rgb: [f32; 3],
    pub opacity: f32,
}

impl CloudShade {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn blend(self, other: CloudShade, progress: f64) -> CloudShade {
        let mix = |a: f32, b: f32| lerp(f64::from(a), f64::from(b), progress) as f32;
        CloudShade {
            rgb: [
                mix(self.rgb[0], other.rgb[0]).round(),
                mix(self.rgb[1], other.rgb[1]).round(),
                mix(self.rgb[2], other.rgb[2]).round(),
            ],
            opacity: mix(self.opacity, other.opacity),
        }
    }
}

/// 0 at night, 1 between the dawn and dusk windows, ramping linearly inside them.
#[must_use]
pub fn daylight_factor(time: f64) -> f64 {
    const DAWN_START: f64 = 0.25;
    const DAWN_END: f64 = 0.40;
    const DUSK_START: f64 = 0.65;
    const DUSK_END: f64 = 0.80;

    if (DAWN_END..=DUSK_START).contains(&time) {
        1.0
    } else if time > DAWN_START && time < DAWN_END {
        (time - DAWN_START) / (DAWN_END - DAWN_START)
    } else if time > DUSK_START && time < DUSK_END {
        1.0 - (time - DUSK_START) / (DUSK_END - DUSK_START)
    } else {
        0.0
    }
}

#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn cloud_shade(theme: Theme, heavy: bool, time: f64) -> CloudShade {
    let pick = |heavy_rgb: [f32; 3], light_rgb: [f32; 3]| if heavy { heavy_rgb } else { light_rgb };
    let (day, night) = match theme {
        Theme::Rainy => (
            pick([90.0, 100.0, 110.0], [120.0, 125.0, 130.0]),
            pick([80.0, 90.0, 100.0], [110.0, 115.0, 120.0]),
        ),
        Theme::Thunderstorm => (
            pick([60.0, 65.0, 75.0], [80.0, 85.0, 95.0]),
            pick([50.0, 55.0, 65.0], [70.0, 75.0, 85.0]),
        ),
        Theme::Snowy => (
            pick([190.0, 195.0, 200.0], [230.0, 235.0, 240.0]),
            pick([180.0, 185.0, 190.0], [220.0, 225.0, 230.0]),
        ),
        _ => (
            pick([200.0, 205.0, 210.0], [255.0, 255.0, 255.0]),
            pick([45.0, 50.0, 60.0], [65.0, 70.0, 80.0]),
        ),
    };

    let daylight = daylight_factor(time);
    let mix = |n: f32, d: f32| lerp(f64::from(n), f64::from(d), daylight) as f32;
    let day_opacity = if heavy { 0.85 } else { 0.7 };
    let night_opacity = if heavy { 0.8 } else { 0.65 };

    let opacity = match theme {
        Theme::Rainy => {
            if heavy {
                0.9
            } else {
                0.75
            }
        }
        Theme::Thunderstorm => {
            if heavy {
                0.95
            } else {
                0.8
            }
        }
        Theme::Snowy => 0.85,
        _ => mix(night_opacity, day_opacity),
    };

    CloudShade {
        rgb: [
            mix(night[0], day[0]),
            mix(night[1], day[1]),
            mix(night[2], day[2]),
        ],
        opacity,
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(960.0, 640.0)
    }

    #[test]
    fn retarget_spawns_to_cover_deficit() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut system = CloudSystem::default();
        system.retarget(Theme::Rainy, viewport(), true, &mut rng);
        assert_eq!(system.count(false), 15);
        assert_eq!(system.count(true), 25);
        assert!(system.clouds().iter().all(|c| c.fade == Fade::In));
        assert!(system.clouds().windows(2).all(|w| w[0].y <= w[1].y));
    }

    #[test]
    fn retarget_marks_surplus_for_fade_out() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut system = CloudSystem::default();
        system.retarget(Theme::Rainy, viewport(), false, &mut rng);
        system.retarget(Theme::Sunny, viewport(), true, &mut rng);

        let fading_heavy = system
            .clouds()
            .iter()
            .filter(|c| c.is_heavy() && c.fade == Fade::Out)
            .count();
        let fading_light = system
            .clouds()
            .iter()
            .filter(|c| !c.is_heavy() && c.fade == Fade::Out)
            .count();
        assert_eq!(fading_heavy, 25);
        assert_eq!(fading_light, 7);
    }

    #[test]
    fn faded_out_clouds_are_removed() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut system = CloudSystem::default();
        system.retarget(Theme::Cloudy, viewport(), false, &mut rng);
        system.retarget(Theme::Night, viewport(), false, &mut rng);
        for _ in 0..400 {
            system.update(1.0, viewport(), 0.005, 0.003);
        }
        assert_eq!(system.count(true), 0);
        assert_eq!(system.count(false), 5);
    }

    #[test]
    fn later_clouds_enter_from_off_screen_left() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut system = CloudSystem::default();
        system.retarget(Theme::Sunny, viewport(), false, &mut rng);
        assert!(
            system
                .clouds()
                .iter()
                .all(|c| (0.0..=viewport().width).contains(&c.x))
        );

        system.retarget(Theme::Cloudy, viewport(), true, &mut rng);
        let arrivals: Vec<&Cloud> = system
            .clouds()
            .iter()
            .filter(|c| c.fade == Fade::In)
            .collect();
        assert_eq!(arrivals.len(), 12 + 15);
        for cloud in arrivals {
            assert!(
                cloud
                    .puffs()
                    .iter()
                    .all(|p| cloud.x + p.offset_x + p.radius < 0.0)
            );
        }
    }

    #[test]
    fn fade_in_ramps_to_steady() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut cloud = Cloud::new(&mut rng, viewport(), 10.0, true, true);
        for _ in 0..250 {
            cloud.update(1.0, viewport(), 0.005, 0.003);
        }
        assert!((cloud.alpha - 1.0).abs() < f32::EPSILON);
        assert_eq!(cloud.fade, Fade::Steady);
    }

    #[test]
    fn clouds_wrap_from_right_edge() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut cloud = Cloud::new(&mut rng, viewport(), 10.0, false, false);
        cloud.x = viewport().width + WRAP_MARGIN;
        cloud.update(1.0, viewport(), 0.005, 0.003);
        assert!((cloud.x + WRAP_MARGIN).abs() < f32::EPSILON);
    }

    #[test]
    fn puffs_are_fixed_at_construction() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut cloud = Cloud::new(&mut rng, viewport(), 10.0, true, false);
        let puffs = cloud.puffs().to_vec();
        assert!((8..=12).contains(&puffs.len()));
        cloud.update(1.0, viewport(), 0.005, 0.003);
        assert_eq!(cloud.puffs(), puffs.as_slice());
    }

    #[test]
    fn daylight_ramps_across_dawn() {
        assert!(daylight_factor(0.1).abs() < f64::EPSILON);
        assert!((daylight_factor(0.325) - 0.5).abs() < 1e-9);
        assert!((daylight_factor(0.5) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn storm_clouds_use_opacity_override() {
        let shade = cloud_shade(Theme::Thunderstorm, true, 0.5);
        assert!((shade.opacity - 0.95).abs() < f32::EPSILON);
        assert_eq!(shade.rgb, [60.0, 65.0, 75.0]);
    }
}
