//! Adaptation helpers driven by the learned tremor profile and click history.

use crate::config::{MAX_SENSITIVITY, MIN_SENSITIVITY};
use crate::geometry::{distance, Point, Rect};
use crate::stats::{Severity, TremorProfile};

/// Minimum clicks observed before the recommended level overrides the
/// configured sensitivity.
pub const MIN_CLICKS_FOR_ADAPTATION: u64 = 10;

/// Assistance level in `1..=5` (higher means more help).
///
/// Success rate sets the base; tremor severity and long hesitations only
/// ever raise it.
pub fn recommended_level(success_rate: f64, severity: Severity, avg_hesitation_ms: f64) -> u8 {
    let mut level: u8 = if success_rate < 0.5 {
        5
    } else if success_rate < 0.7 {
        4
    } else if success_rate < 0.85 {
        3
    } else if success_rate < 0.95 {
        2
    } else {
        1
    };

    match severity {
        Severity::Severe => level = level.max(4),
        Severity::Moderate => level = level.max(3),
        _ => {}
    }

    if avg_hesitation_ms > 3000.0 {
        level = level.max(4);
    } else if avg_hesitation_ms > 2000.0 {
        level = level.max(3);
    }

    level.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}

/// Distance from the target centre beyond which a click is expected to miss.
pub fn miss_threshold(severity: Severity) -> f64 {
    match severity {
        Severity::Severe => 30.0,
        Severity::Moderate => 20.0,
        _ => 10.0,
    }
}

pub fn will_click_miss(cursor: Point, target: &Rect, profile: &TremorProfile) -> bool {
    distance(cursor, target.center()) > miss_threshold(profile.severity)
}

/// Point `strength` of the way from the cursor to the target centre.
pub fn snap_position(cursor: Point, target: &Rect, strength: f64) -> Point {
    let center = target.center();
    Point::new(
        cursor.x + (center.x - cursor.x) * strength,
        cursor.y + (center.y - cursor.y) * strength,
    )
}

/// Translation that moves the target toward the cursor, no longer than `max_px`.
pub fn snap_offset(cursor: Point, target: &Rect, strength: f64, max_px: f64) -> (f64, f64) {
    let center = target.center();
    let dx = (cursor.x - center.x) * strength;
    let dy = (cursor.y - center.y) * strength;
    let len = dx.hypot(dy);
    if len <= max_px || len == 0.0 {
        return (dx, dy);
    }
    let k = max_px.max(0.0) / len;
    (dx * k, dy * k)
}

/// Running mean of hover dwell times.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DwellAverage {
    total_ms: u64,
    count: u64,
}

impl DwellAverage {
    pub fn record(&mut self, dwell_ms: u64) {
        self.total_ms = self.total_ms.saturating_add(dwell_ms);
        self.count += 1;
    }

    pub fn mean_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_ms as f64 / self.count as f64
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
