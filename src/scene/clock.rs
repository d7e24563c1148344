use std::f64::consts::{PI, TAU};

use super::color::lerp;
use super::geom::Point;

/// Gaps at or below this many days are traversed directly, never wrapped.
pub const NO_WRAP_GAP: f64 = 3.0 / 24.0;

const NIGHT_BEFORE: f64 = 0.28;
const NIGHT_AFTER: f64 = 0.72;

/// Reduces any time value into `[0, 1)`.
#[must_use]
pub fn wrap_day(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

#[must_use]
pub fn is_night_time(time: f64) -> bool {
    let t = wrap_day(time);
    t < NIGHT_BEFORE || t > NIGHT_AFTER
}

/// A timed transition measured against the scene clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub started_ms: f64,
    pub duration_ms: f64,
}

impl Transition {
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeOfDay {
    current: f64,
    start: f64,
    target: f64,
    transition: Option<Transition>,
}

impl TimeOfDay {
    #[must_use]
    pub fn new(time: f64) -> Self {
        let t = wrap_day(time);
        Self {
            current: t,
            start: t,
            target: t,
            transition: None,
        }
    }

    /// Displayed value, always reduced into `[0, 1)`.
    #[must_use]
    pub fn value(&self) -> f64 {
        wrap_day(self.current)
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    #[must_use]
    pub fn transition_progress(&self, now_ms: f64) -> Option<f64> {
        self.transition.map(|t| t.progress(now_ms))
    }

    #[must_use]
    pub fn is_night(&self) -> bool {
        is_night_time(self.current)
    }

    /// Begins an interpolation towards `new_time`.
    ///
    /// Backward hops longer than three hours wrap forward through midnight,
    /// and forward hops that would cover almost the whole day wrap the start
    /// instead, so the traversal never exceeds `1 - 3/24`.
    pub fn set_target(&mut self, new_time: f64, duration_ms: f64, now_ms: f64) {
        let mut current = wrap_day(self.current);
        let mut target = wrap_day(new_time);

        if target < current {
            if current - target > NO_WRAP_GAP {
                target += 1.0;
            }
        } else if target - current > 1.0 - NO_WRAP_GAP {
            current += 1.0;
        }

        self.start = current;
        self.current = current;
        self.target = target;
        self.transition = Some(Transition {
            started_ms: now_ms,
            duration_ms,
        });
    }

    pub fn set_instant(&mut self, time: f64) {
        let t = wrap_day(time);
        self.current = t;
        self.start = t;
        self.target = t;
        self.transition = None;
    }

    pub fn cancel_transition(&mut self) {
        self.transition = None;
        self.current = wrap_day(self.current);
        self.target = self.current;
    }

    pub fn advance(&mut self, now_ms: f64) {
        let Some(transition) = self.transition else {
            return;
        };
        let progress = transition.progress(now_ms);
        self.current = lerp(self.start, self.target, progress);
        if progress >= 1.0 {
            self.transition = None;
            self.current = wrap_day(self.target);
        }
    }

    /// Whole minutes since midnight, tolerant of float noise on minute boundaries.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn minute_of_day(&self) -> u32 {
        ((self.value() * 1440.0 + 1e-6).floor() as u32).min(1439)
    }

    /// `HH:MM` for the clock face.
    #[must_use]
    pub fn hh_mm(&self) -> String {
        let total_minutes = self.minute_of_day();
        format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
    }

    /// Hour and minute hand angles in radians, clockwise from twelve.
    #[must_use]
    pub fn hand_angles(&self) -> (f64, f64) {
        let total_minutes = self.minute_of_day();
        let hours = f64::from(total_minutes / 60);
        let minutes = f64::from(total_minutes % 60);
        let minute = minutes / 60.0 * TAU;
        let hour = (hours % 12.0) / 12.0 * TAU + minutes / 60.0 * (TAU / 12.0);
        (hour, minute)
    }
}

/// Angle of `point` around `center`, clockwise from twelve o'clock, in `[0, 2π)`.
#[must_use]
pub fn dial_angle(center: Point, point: Point) -> f64 {
    let dy = f64::from(point.y - center.y);
    let dx = f64::from(point.x - center.x);
    let mut angle = dy.atan2(dx) + PI / 2.0;
    if angle < 0.0 {
        angle += TAU;
    }
    angle
}

/// Tracks a drag on the clock face, where a full turn is one hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockDrag {
    last_minute_fraction: f64,
    hour_offset: i64,
}

impl ClockDrag {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn begin(time: f64) -> Self {
        let total_minutes = wrap_day(time) * 1440.0;
        let hours = total_minutes / 60.0;
        let minutes = total_minutes % 60.0;
        Self {
            last_minute_fraction: minutes / 60.0,
            hour_offset: hours.floor() as i64,
        }
    }

    #[must_use]
    pub fn hour_offset(&self) -> i64 {
        self.hour_offset
    }

    /// Maps a dial angle to a time of day, carrying the hour across the top.
    #[allow(clippy::cast_precision_loss)]
    pub fn update(&mut self, angle: f64) -> f64 {
        let minute_fraction = angle / TAU;
        if self.last_minute_fraction > 0.9 && minute_fraction < 0.1 {
            self.hour_offset += 1;
        } else if self.last_minute_fraction < 0.1 && minute_fraction > 0.9 {
            self.hour_offset -= 1;
        }
        self.last_minute_fraction = minute_fraction;

        let total_minutes = self.hour_offset as f64 * 60.0 + minute_fraction * 60.0;
        wrap_day(total_minutes / 1440.0)
    }
}
