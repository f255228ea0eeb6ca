//! Heuristic intended-target scorer.
//!
//! Deterministic: identical history and candidates always yield the same
//! winner. Ties go to the candidate that appears first.

use crate::geometry::{angle_between, direction, distance, speed, Direction, Point, Rect};
use crate::history::CursorHistory;
use crate::view::ElementId;
use std::f64::consts::PI;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: ElementId,
    pub rect: Rect,
}

impl Candidate {
    pub fn new(id: ElementId, rect: Rect) -> Self {
        Self { id, rect }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictorWeights {
    pub distance: f64,
    pub area: f64,
    pub alignment: f64,
    /// Candidates farther than this score zero on distance.
    pub distance_range_px: f64,
    /// Area at which the size score saturates.
    pub area_cap_px2: f64,
    pub lookahead_px: f64,
    pub step_px: f64,
    pub velocity_window: usize,
    pub direction_window: usize,
}

impl Default for PredictorWeights {
    fn default() -> Self {
        Self {
            distance: 0.4,
            area: 0.2,
            alignment: 0.4,
            distance_range_px: 300.0,
            area_cap_px2: 5000.0,
            lookahead_px: 150.0,
            step_px: 10.0,
            velocity_window: 5,
            direction_window: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub id: ElementId,
    pub score: f64,
    pub on_path: bool,
}

/// Movement summary derived from the newest samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: Point,
    pub velocity_px_s: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default)]
pub struct TargetPredictor {
    pub weights: PredictorWeights,
}

impl TargetPredictor {
    pub fn new(weights: PredictorWeights) -> Self {
        Self { weights }
    }

    pub fn predict(&self, history: &CursorHistory, candidates: &[Candidate]) -> Option<ElementId> {
        match candidates {
            [] => None,
            [only] => Some(only.id),
            _ => self
                .rank(history, candidates)
                .into_iter()
                .next()
                .map(|s| s.id),
        }
    }

    /// All scored candidates, best first. Only candidates the projected path
    /// crosses are ranked when there are any; otherwise everyone is.
    pub fn rank(&self, history: &CursorHistory, candidates: &[Candidate]) -> Vec<ScoredCandidate> {
        let Some(motion) = self.motion(history) else {
            return candidates
                .iter()
                .map(|c| ScoredCandidate {
                    id: c.id,
                    score: 0.0,
                    on_path: false,
                })
                .collect();
        };

        let path = self.project_path(&motion);
        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|c| ScoredCandidate {
                id: c.id,
                score: self.score(c, &motion),
                on_path: !motion.direction.is_stationary()
                    && path.iter().any(|p| c.rect.contains(*p)),
            })
            .collect();

        if scored.iter().any(|s| s.on_path) {
            scored.retain(|s| s.on_path);
        }

        // Stable sort keeps input order among equal scores.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        if let Some(best) = scored.first() {
            debug!(
                "Prediction: {} scored {:.3} (v={:.0}px/s)",
                best.id, best.score, motion.velocity_px_s
            );
        }
        scored
    }

    pub fn motion(&self, history: &CursorHistory) -> Option<Motion> {
        let latest = history.latest()?;
        let velocity_samples = history.tail(self.weights.velocity_window);
        let direction_samples = history.tail(self.weights.direction_window);
        Some(Motion {
            position: Point::from(latest),
            velocity_px_s: speed(&velocity_samples),
            direction: direction(&direction_samples),
        })
    }

    /// Points from the current position along the heading, `step_px` apart.
    pub fn project_path(&self, motion: &Motion) -> Vec<Point> {
        let step = self.weights.step_px.max(1.0);
        let steps = (self.weights.lookahead_px / step).floor() as usize;
        let (sin, cos) = motion.direction.angle.sin_cos();
        (0..=steps)
            .map(|i| {
                let d = i as f64 * step;
                Point::new(motion.position.x + cos * d, motion.position.y + sin * d)
            })
            .collect()
    }

    /// Weighted sum of normalised distance, size and alignment scores.
    pub fn score(&self, candidate: &Candidate, motion: &Motion) -> f64 {
        let w = &self.weights;
        let center = candidate.rect.center();

        let dist = distance(motion.position, center);
        let distance_score = (1.0 - dist / w.distance_range_px).max(0.0);

        let area_score = (candidate.rect.area() / w.area_cap_px2).min(1.0);

        let alignment_score = if motion.direction.is_stationary() || dist == 0.0 {
            0.0
        } else {
            let to_target = (center.y - motion.position.y).atan2(center.x - motion.position.x);
            1.0 - angle_between(to_target, motion.direction.angle) / PI
        };

        w.distance * distance_score + w.area * area_score + w.alignment * alignment_score
    }
}
