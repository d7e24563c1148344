use serde::{Deserialize, Serialize};

/// Scene units per terminal column.
pub const CELL_WIDTH: f32 = 8.0;
/// Scene units per terminal row.
pub const CELL_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Centre of a terminal cell in scene units.
    #[must_use]
    pub fn from_cell(column: u16, row: u16) -> Self {
        Self {
            x: (f32::from(column) + 0.5) * CELL_WIDTH,
            y: (f32::from(row) + 0.5) * CELL_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn from_cells(columns: u16, rows: u16) -> Self {
        Self {
            width: f32::from(columns) * CELL_WIDTH,
            height: f32::from(rows) * CELL_HEIGHT,
        }
    }
}

/// Bounding box of the weather card in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CardRect {
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_cells(x: u16, y: u16, columns: u16, rows: u16) -> Self {
        Self {
            left: f32::from(x) * CELL_WIDTH,
            top: f32::from(y) * CELL_HEIGHT,
            width: f32::from(columns) * CELL_WIDTH,
            height: f32::from(rows) * CELL_HEIGHT,
        }
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Strict containment, matching a pointer that is "over" the card.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.left && point.x < self.right() && point.y > self.top && point.y < self.bottom()
    }

    #[must_use]
    pub fn to_card(&self, point: Point) -> Point {
        Point::new(point.x - self.left, point.y - self.top)
    }

    #[must_use]
    pub fn to_screen(&self, point: Point) -> Point {
        Point::new(point.x + self.left, point.y + self.top)
    }
}
