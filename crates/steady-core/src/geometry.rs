use crate::history::CursorSample;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<&CursorSample> for Point {
    fn from(s: &CursorSample) -> Self {
        Self { x: s.x, y: s.y }
    }
}

/// Axis-aligned box in viewport pixels (what `getBoundingClientRect` reports).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Box of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    #[inline(always)]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline(always)]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline(always)]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline(always)]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Grows the box by `by` pixels on every side.
    pub fn inflate(&self, by: f64) -> Self {
        Self::new(
            self.left - by,
            self.top - by,
            self.width + 2.0 * by,
            self.height + 2.0 * by,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

/// Heading of recent movement. `angle` is `atan2(dy, dx)` in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Direction {
    pub angle: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Direction {
    pub fn is_stationary(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

#[inline(always)]
pub fn euclidean_dist(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    (dx * dx + dy * dy).sqrt()
}

#[inline(always)]
pub fn distance(a: Point, b: Point) -> f64 {
    euclidean_dist(a.x, a.y, b.x, b.y)
}

/// Straight-line speed between the first and last sample, in px/s.
/// Zero when fewer than two samples or no time elapsed.
pub fn speed(samples: &[CursorSample]) -> f64 {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return 0.0;
    };
    if samples.len() < 2 {
        return 0.0;
    }

    let elapsed_s = last.timestamp_ms.saturating_sub(first.timestamp_ms) as f64 / 1000.0;
    if elapsed_s <= 0.0 {
        return 0.0;
    }
    distance(first.into(), last.into()) / elapsed_s
}

/// Direction from the first to the last sample.
pub fn direction(samples: &[CursorSample]) -> Direction {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Direction::default();
    };
    if samples.len() < 2 {
        return Direction::default();
    }

    let dx = last.x - first.x;
    let dy = last.y - first.y;
    Direction {
        angle: dy.atan2(dx),
        dx,
        dy,
    }
}

/// Smallest absolute difference between two angles, in `[0, PI]`.
pub fn angle_between(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(2.0 * PI);
    if diff > PI {
        2.0 * PI - diff
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: f64, y: f64, t: u64) -> CursorSample {
        CursorSample::new(x, y, t)
    }

    #[test]
    fn test_speed_px_per_second() {
        let samples = [s(0.0, 0.0, 0), s(30.0, 40.0, 500)];
        assert!((speed(&samples) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_insufficient_data_is_zero() {
        assert_eq!(speed(&[]), 0.0);
        assert_eq!(speed(&[s(1.0, 1.0, 10)]), 0.0);
        assert_eq!(speed(&[s(0.0, 0.0, 10), s(5.0, 0.0, 10)]), 0.0);
    }

    #[test]
    fn test_direction_east() {
        let d = direction(&[s(0.0, 0.0, 0), s(5.0, 0.0, 10), s(10.0, 0.0, 20)]);
        assert_eq!(d.angle, 0.0);
        assert_eq!(d.dx, 10.0);
    }

    #[test]
    fn test_angle_between_wraps() {
        assert!((angle_between(PI - 0.1, -PI + 0.1) - 0.2).abs() < 1e-9);
        assert!((angle_between(0.0, PI) - PI).abs() < 1e-9);
        assert_eq!(angle_between(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::new(10.0, 20.0, 40.0, 20.0);
        assert_eq!(r.center(), Point::new(30.0, 30.0));
        assert!(r.contains(Point::new(50.0, 40.0)));
        assert!(!r.contains(Point::new(50.1, 40.0)));
        assert_eq!(r.inflate(5.0).area(), 50.0 * 30.0);
    }
}
