use super::geom::{CardRect, Point};

/// Last known pointer position in screen space and relative to the card.
///
/// Both halves stay `None` until the first move; every force field treats a
/// missing pointer as "no interaction this frame".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    screen: Option<Point>,
    card: Option<Point>,
}

impl Pointer {
    pub fn move_to(&mut self, screen: Point, card: &CardRect) {
        self.screen = Some(screen);
        self.card = Some(card.to_card(screen));
    }

    /// Recomputes the card-relative half after the card moved.
    pub fn reproject(&mut self, card: &CardRect) {
        self.card = self.screen.map(|screen| card.to_card(screen));
    }

    #[must_use]
    pub fn screen(&self) -> Option<Point> {
        self.screen
    }

    #[must_use]
    pub fn card(&self) -> Option<Point> {
        self.card
    }

    #[must_use]
    pub fn is_over(&self, card: &CardRect) -> bool {
        self.screen.is_some_and(|p| card.contains(p))
    }
}

/// Rolling pointer speed used to shake soot loose.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShakeSampler {
    last: Point,
    last_ms: f64,
    speed: f32,
}

impl ShakeSampler {
    /// Samples at most once per `interval_ms`; returns true when the pointer
    /// moved faster than `threshold` units per millisecond since the last sample.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&mut self, pointer: Point, now_ms: f64, interval_ms: f64, threshold: f32) -> bool {
        let elapsed = now_ms - self.last_ms;
        if elapsed <= interval_ms {
            return false;
        }
        self.speed = pointer.distance(self.last) / elapsed as f32;
        self.last = pointer;
        self.last_ms = now_ms;
        self.speed > threshold
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }
}
