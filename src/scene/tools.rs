use super::geom::{Point, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Umbrella,
    Heater,
    Torch,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Umbrella, Tool::Heater, Tool::Torch];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tool::Umbrella => "Umbrella",
            Tool::Heater => "Heater",
            Tool::Torch => "Torch",
        }
    }

    #[must_use]
    pub fn hotkey(self) -> char {
        match self {
            Tool::Umbrella => 'u',
            Tool::Heater => 'h',
            Tool::Torch => 't',
        }
    }

    #[must_use]
    pub fn from_hotkey(key: char) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.hotkey() == key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tools {
    pub umbrella: bool,
    pub heater: bool,
    pub torch: bool,
}

impl Tools {
    #[must_use]
    pub fn is_active(&self, tool: Tool) -> bool {
        match tool {
            Tool::Umbrella => self.umbrella,
            Tool::Heater => self.heater,
            Tool::Torch => self.torch,
        }
    }

    /// Flips the flag and returns its new state.
    pub fn toggle(&mut self, tool: Tool) -> bool {
        let flag = match tool {
            Tool::Umbrella => &mut self.umbrella,
            Tool::Heater => &mut self.heater,
            Tool::Torch => &mut self.torch,
        };
        *flag = !*flag;
        *flag
    }
}

pub const SHADE_LAYERS: usize = 5;
const SHADE_LENGTH: f32 = 300.0;

/// One layer of the umbrella's shadow, an ellipse rotated by `angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeEllipse {
    pub center: Point,
    pub radius_x: f32,
    pub radius_y: f32,
    pub angle: f32,
    pub alpha: f32,
}

impl ShadeEllipse {
    #[must_use]
    pub fn covers(&self, point: Point) -> bool {
        let (sin, cos) = (-self.angle).sin_cos();
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let local_x = dx * cos - dy * sin;
        let local_y = dx * sin + dy * cos;
        (local_x / self.radius_x).powi(2) + (local_y / self.radius_y).powi(2) <= 1.0
    }
}

/// Shadow cast away from the sun, longer the higher the sun sits.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn umbrella_shade(pointer: Point, sun: Point, viewport: Viewport) -> [ShadeEllipse; SHADE_LAYERS] {
    let angle = (pointer.y - sun.y).atan2(pointer.x - sun.x);
    let height_factor = (1.0 - sun.y / (viewport.height * 0.7)).max(0.0);
    let length = SHADE_LENGTH * height_factor;

    std::array::from_fn(|i| {
        let progression = i as f32 / (SHADE_LAYERS - 1) as f32;
        ShadeEllipse {
            center: Point::new(
                pointer.x + angle.cos() * length * progression,
                pointer.y + angle.sin() * length * progression,
            ),
            radius_x: 100.0 - progression * 50.0,
            radius_y: 75.0 - progression * 40.0,
            angle,
            alpha: 0.05 * (1.0 - progression),
        }
    })
}
