//! Rasterises a [`Scene`] into terminal cells.
//!
//! Each cell samples the scene at its centre; one cell covers
//! [`CELL_WIDTH`] × [`CELL_HEIGHT`] scene units.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::scene::{
    Scene,
    color::Rgb,
    geom::{CELL_HEIGHT, CELL_WIDTH, Point},
    heat::PuffKind,
    lightning::LightningBolt,
    precipitation::ParticleKind,
    sky::SUN_SIZE,
};

use super::palette::ColorCapability;

const SUN_CORE: Rgb = Rgb(255, 236, 160);
const SUN_GLOW: Rgb = Rgb(255, 200, 110);
const MOON_LIGHT: Rgb = Rgb(228, 230, 240);
const STAR: Rgb = Rgb(255, 255, 255);
const RAIN: Rgb = Rgb(160, 190, 230);
const DRIP: Rgb = Rgb(175, 215, 255);
const SNOW: Rgb = Rgb(245, 248, 255);
const BOLT: Rgb = Rgb(255, 255, 225);
const BOLT_GLOW: Rgb = Rgb(200, 200, 255);
const FLAME_HOT: Rgb = Rgb(255, 225, 110);
const FLAME_COOL: Rgb = Rgb(255, 70, 20);
const SMOKE: Rgb = Rgb(120, 120, 125);
const STEAM: Rgb = Rgb(235, 240, 245);
const SOOT: Rgb = Rgb(28, 26, 24);
const FROST: Rgb = Rgb(215, 238, 255);
const HEAT_GLOW: Rgb = Rgb(255, 130, 50);
const GLASS: Rgb = Rgb(12, 14, 22);
const SHADOW: Rgb = Rgb(0, 0, 0);

const GLASS_ALPHA: f32 = 0.45;
const TORCH_RADIUS: f32 = 180.0;
const TORCH_DARKNESS: f32 = 0.3;

pub struct SceneView<'a> {
    pub scene: &'a Scene,
    /// Card area in cells, painted as darkened glass.
    pub card: Rect,
    pub capability: ColorCapability,
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let mut raster = Raster::new(area.width, area.height);
        let scene = self.scene;

        paint_sky(&mut raster, scene);
        paint_stars(&mut raster, scene);
        paint_bodies(&mut raster, scene);
        paint_clouds(&mut raster, scene);
        paint_lightning(&mut raster, scene);
        paint_precipitation(&mut raster, scene);
        paint_shade(&mut raster, scene);
        paint_card(&mut raster, scene, self.card, area);
        paint_fire(&mut raster, scene);
        if scene.tools().torch {
            paint_torch(&mut raster, scene.pointer().screen());
        }

        raster.flush(area, buf, self.capability);
    }
}

struct Raster {
    width: u16,
    height: u16,
    bg: Vec<Rgb>,
    glyphs: Vec<Option<(char, Rgb)>>,
}

impl Raster {
    fn new(width: u16, height: u16) -> Self {
        let len = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            bg: vec![Rgb(0, 0, 0); len],
            glyphs: vec![None; len],
        }
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let inside = (0..i32::from(self.width)).contains(&column)
            && (0..i32::from(self.height)).contains(&row);
        inside.then(|| row as usize * usize::from(self.width) + column as usize)
    }

    fn cell_of(&self, point: Point) -> Option<usize> {
        self.index(
            (point.x / CELL_WIDTH).floor() as i32,
            (point.y / CELL_HEIGHT).floor() as i32,
        )
    }

    fn center(&self, idx: usize) -> Point {
        let width = usize::from(self.width);
        Point::from_cell((idx % width) as u16, (idx / width) as u16)
    }

    /// Visits every cell whose centre lies inside the circle, with the
    /// normalised distance from the centre.
    fn for_circle(&mut self, center: Point, radius: f32, mut visit: impl FnMut(&mut Self, usize, f32)) {
        if radius <= 0.0 {
            return;
        }
        let min_col = ((center.x - radius) / CELL_WIDTH).floor() as i32;
        let max_col = ((center.x + radius) / CELL_WIDTH).ceil() as i32;
        let min_row = ((center.y - radius) / CELL_HEIGHT).floor() as i32;
        let max_row = ((center.y + radius) / CELL_HEIGHT).ceil() as i32;
        for row in min_row.max(0)..=max_row.min(i32::from(self.height) - 1) {
            for column in min_col.max(0)..=max_col.min(i32::from(self.width) - 1) {
                let Some(idx) = self.index(column, row) else {
                    continue;
                };
                let distance = self.center(idx).distance(center) / radius;
                if distance <= 1.0 {
                    visit(self, idx, distance);
                }
            }
        }
    }

    fn blend(&mut self, idx: usize, color: Rgb, alpha: f32) {
        self.bg[idx] = color.over(self.bg[idx], alpha);
    }

    fn put(&mut self, point: Point, glyph: char, color: Rgb, alpha: f32) {
        if let Some(idx) = self.cell_of(point) {
            let fg = color.over(self.bg[idx], alpha);
            self.glyphs[idx] = Some((glyph, fg));
        }
    }

    fn line(&mut self, from: Point, to: Point, color: Rgb, alpha: f32) {
        let glyph = stroke_glyph(from, to);
        let steps = ((to.x - from.x).abs() / CELL_WIDTH)
            .max((to.y - from.y).abs() / CELL_HEIGHT)
            .ceil()
            .max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let point = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            self.put(point, glyph, color, alpha);
        }
    }

    fn flush(&self, area: Rect, buf: &mut Buffer, capability: ColorCapability) {
        for (idx, bg) in self.bg.iter().enumerate() {
            let x = area.x + (idx % usize::from(self.width)) as u16;
            let y = area.y + (idx / usize::from(self.width)) as u16;
            let Some(cell) = buf.cell_mut((x, y)) else {
                continue;
            };
            match self.glyphs[idx] {
                Some((glyph, fg)) => {
                    cell.set_char(glyph);
                    if let Some(color) = capability.paint(fg) {
                        cell.set_fg(color);
                    }
                }
                None => {
                    cell.set_char(' ');
                }
            }
            if let Some(color) = capability.paint(*bg) {
                cell.set_bg(color);
            }
        }
    }
}

/// Box-drawing glyph closest to the segment's slope in screen space.
fn stroke_glyph(from: Point, to: Point) -> char {
    let dx = (to.x - from.x) / CELL_WIDTH;
    let dy = (to.y - from.y) / CELL_HEIGHT;
    if dx.abs() > dy.abs() * 2.0 {
        '─'
    } else if dy.abs() > dx.abs() * 2.0 {
        '│'
    } else if (dx > 0.0) == (dy > 0.0) {
        '╲'
    } else {
        '╱'
    }
}

fn paint_sky(raster: &mut Raster, scene: &Scene) {
    let sky = scene.sky();
    let rows = usize::from(raster.height);
    let width = usize::from(raster.width);
    for row in 0..rows {
        let t = if rows <= 1 {
            0.0
        } else {
            row as f64 / (rows - 1) as f64
        };
        let color = sky.top.lerp(sky.bottom, t);
        raster.bg[row * width..(row + 1) * width].fill(color);
    }
}

fn paint_stars(raster: &mut Raster, scene: &Scene) {
    let visibility = scene.star_visibility();
    if visibility <= 0.0 {
        return;
    }
    for star in scene.stars().stars() {
        let alpha = star.alpha * visibility;
        if alpha > 0.15 {
            let glyph = if star.radius > 1.1 { '✦' } else { '·' };
            raster.put(star.position, glyph, STAR, alpha);
        }
    }
    for streak in scene.stars().shooting_stars() {
        raster.line(streak.tail(), streak.head, STAR, 0.6 * visibility);
        raster.put(streak.head, '*', STAR, visibility);
    }
}

fn paint_bodies(raster: &mut Raster, scene: &Scene) {
    let celestial = scene.celestial();
    if celestial.sun.visible {
        let sun = celestial.sun;
        raster.for_circle(sun.position, sun.radius, |r, idx, d| {
            r.blend(idx, SUN_GLOW, 0.55 * (1.0 - d).powi(2));
        });
        raster.for_circle(sun.position, SUN_SIZE * 0.5, |r, idx, _| {
            r.blend(idx, SUN_CORE, 1.0);
        });
    }
    if celestial.moon.visible {
        let moon = celestial.moon;
        let texture = scene.moon_texture();
        raster.for_circle(moon.position, moon.radius * 1.6, |r, idx, d| {
            r.blend(idx, MOON_LIGHT, 0.12 * (1.0 - d));
        });
        raster.for_circle(moon.position, moon.radius, |r, idx, _| {
            let cell = r.center(idx);
            let u = (cell.x - moon.position.x) / moon.radius;
            let v = (cell.y - moon.position.y) / moon.radius;
            let brightness = texture.sample(u, v);
            if brightness > 0.0 {
                r.blend(idx, MOON_LIGHT.scale(brightness), 0.95);
            }
        });
    }
}

fn paint_clouds(raster: &mut Raster, scene: &Scene) {
    let light = scene.cloud_shade(false);
    let heavy = scene.cloud_shade(true);
    let mut coverage = vec![0.0_f32; raster.bg.len()];

    for cloud in scene.clouds().clouds() {
        let shade = if cloud.is_heavy() { heavy } else { light };
        let color = Rgb(
            shade.rgb[0] as u8,
            shade.rgb[1] as u8,
            shade.rgb[2] as u8,
        );
        let mut touched = Vec::new();
        for puff in cloud.puffs() {
            let center = Point::new(cloud.x + puff.offset_x, cloud.y + puff.offset_y);
            raster.for_circle(center, puff.radius, |_, idx, d| {
                let soft = (1.0 - d * d).clamp(0.0, 1.0);
                if coverage[idx] == 0.0 {
                    touched.push(idx);
                }
                coverage[idx] = coverage[idx].max(soft);
            });
        }
        for idx in touched {
            let amount = (coverage[idx] * 2.0).min(1.0);
            raster.blend(idx, color, cloud.alpha * shade.opacity * amount);
            coverage[idx] = 0.0;
        }
    }
}

fn paint_lightning(raster: &mut Raster, scene: &Scene) {
    for bolt in scene.lightning().bolts() {
        bolt.for_each_stroke(&mut |stroke: &LightningBolt, life: f32| {
            let alpha = life.clamp(0.0, 1.0);
            for point in stroke.path() {
                raster.for_circle(*point, stroke.glow_radius(), |r, idx, d| {
                    r.blend(idx, BOLT_GLOW, 0.25 * alpha * (1.0 - d));
                });
            }
            for pair in stroke.path().windows(2) {
                raster.line(pair[0], pair[1], BOLT, alpha);
            }
        });
    }
}

fn paint_precipitation(raster: &mut Raster, scene: &Scene) {
    for particle in scene.precipitation().particles() {
        match particle.kind {
            ParticleKind::Rain => raster.put(particle.position, '│', RAIN, 0.8),
            ParticleKind::Snow { .. } => {
                let glyph = if particle.size > 2.2 { '•' } else { '·' };
                raster.put(particle.position, glyph, SNOW, 0.9);
            }
            ParticleKind::MeltDrip { .. } => {
                raster.put(particle.position, '\'', DRIP, particle.life.clamp(0.2, 1.0));
            }
        }
    }
}

fn paint_shade(raster: &mut Raster, scene: &Scene) {
    let Some(layers) = scene.umbrella_shade() else {
        return;
    };
    for layer in layers {
        let reach = layer.radius_x.max(layer.radius_y);
        raster.for_circle(layer.center, reach, |r, idx, _| {
            if layer.covers(r.center(idx)) {
                r.blend(idx, SHADOW, layer.alpha);
            }
        });
    }
}

fn paint_card(raster: &mut Raster, scene: &Scene, card: Rect, area: Rect) {
    let card_rect = scene.card();
    for row in card.top()..card.bottom() {
        for column in card.left()..card.right() {
            let column = i32::from(column) - i32::from(area.x);
            let row = i32::from(row) - i32::from(area.y);
            if let Some(idx) = raster.index(column, row) {
                raster.blend(idx, GLASS, GLASS_ALPHA);
                raster.glyphs[idx] = None;
            }
        }
    }

    let glow = scene.heat().glow();
    if glow.intensity > 0.01 {
        let center = card_rect.to_screen(glow.anchor);
        raster.for_circle(center, glow.radius(), |r, idx, d| {
            if card_rect.contains(r.center(idx)) {
                r.blend(idx, HEAT_GLOW, glow.intensity * (1.0 - d));
            }
        });
    }

    for crystal in scene.frost().crystals() {
        let alpha = crystal.life().clamp(0.0, 1.0) * 0.8;
        let path = crystal.path();
        for point in path {
            raster.put(card_rect.to_screen(*point), '·', FROST, alpha);
        }
        if let Some(tip) = path.last() {
            raster.put(card_rect.to_screen(*tip), '*', FROST, alpha);
        }
    }
}

fn paint_fire(raster: &mut Raster, scene: &Scene) {
    let heat = scene.heat();
    for puff in heat.puffs() {
        let (glyph, color) = match puff.kind {
            PuffKind::Smoke => (if puff.rotation.sin() > 0.0 { '░' } else { '▒' }, SMOKE),
            PuffKind::Steam => ('°', STEAM),
        };
        raster.put(puff.position, glyph, color, puff.opacity());
    }
    for flame in heat.flames() {
        let life = flame.life.clamp(0.0, 1.0);
        let color = FLAME_COOL.lerp(FLAME_HOT, f64::from(life));
        let glyph = if flame.size > 18.0 { '▲' } else { '^' };
        raster.put(flame.position, glyph, color, life);
    }
    for soot in heat.soot() {
        let glyph = if soot.stuck { '●' } else { '•' };
        raster.put(soot.position, glyph, SOOT, 1.0);
    }
}

fn paint_torch(raster: &mut Raster, pointer: Option<Point>) {
    for idx in 0..raster.bg.len() {
        let lit = pointer.map_or(0.0, |p| {
            (1.0 - raster.center(idx).distance(p) / TORCH_RADIUS).max(0.0)
        });
        let factor = TORCH_DARKNESS + (1.0 - TORCH_DARKNESS) * lit.sqrt();
        raster.bg[idx] = raster.bg[idx].scale(factor);
        if let Some((glyph, fg)) = raster.glyphs[idx] {
            raster.glyphs[idx] = Some((glyph, fg.scale(factor)));
        }
    }
}
