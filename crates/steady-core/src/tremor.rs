//! Tremor estimation from micro-movements in the cursor history.
//!
//! A micro-movement is a step between consecutive samples that is non-zero,
//! shorter than [`TremorThresholds::micro_max_px`] and faster than
//! [`TremorThresholds::micro_max_gap_ms`]. Frequency is the count of such
//! steps inside the trailing one-second window (an oscillation-rate
//! approximation, not a spectral estimate). Amplitude is their mean length.

use crate::geometry::euclidean_dist;
use crate::history::CursorHistory;
use crate::stats::{Severity, TremorProfile};
use itertools::Itertools;

pub const MIN_SAMPLES: usize = 10;
pub const FREQUENCY_WINDOW_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicroMovement {
    pub distance: f64,
    pub time_delta_ms: u64,
    pub timestamp_ms: u64,
}

/// (amplitude px, frequency Hz) pairs that must both be exceeded.
#[derive(Debug, Clone, PartialEq)]
pub struct TremorThresholds {
    pub micro_max_px: f64,
    pub micro_max_gap_ms: u64,
    pub severe: (f64, f64),
    pub moderate: (f64, f64),
    pub mild: (f64, f64),
}

impl Default for TremorThresholds {
    fn default() -> Self {
        Self {
            micro_max_px: 10.0,
            micro_max_gap_ms: 100,
            severe: (5.0, 3.0),
            moderate: (3.0, 2.0),
            mild: (1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TremorAnalyzer {
    pub thresholds: TremorThresholds,
}

impl TremorAnalyzer {
    pub fn new(thresholds: TremorThresholds) -> Self {
        Self { thresholds }
    }

    pub fn analyze(&self, history: &CursorHistory) -> TremorProfile {
        if history.len() < MIN_SAMPLES {
            return TremorProfile::UNKNOWN;
        }

        let micro = self.micro_movements(history);
        let now_ms = history.latest().map(|s| s.timestamp_ms).unwrap_or(0);
        let frequency_hz = frequency(&micro, now_ms);
        let amplitude_px = amplitude(&micro);

        TremorProfile {
            severity: self.classify(amplitude_px, frequency_hz),
            frequency_hz,
            amplitude_px,
        }
    }

    pub fn micro_movements(&self, history: &CursorHistory) -> Vec<MicroMovement> {
        history
            .iter()
            .tuple_windows()
            .filter_map(|(prev, curr)| {
                let distance = euclidean_dist(prev.x, prev.y, curr.x, curr.y);
                let time_delta_ms = curr.timestamp_ms.saturating_sub(prev.timestamp_ms);
                let is_micro = distance > 0.0
                    && distance < self.thresholds.micro_max_px
                    && time_delta_ms < self.thresholds.micro_max_gap_ms;
                is_micro.then_some(MicroMovement {
                    distance,
                    time_delta_ms,
                    timestamp_ms: curr.timestamp_ms,
                })
            })
            .collect()
    }

    pub fn classify(&self, amplitude_px: f64, frequency_hz: f64) -> Severity {
        let t = &self.thresholds;
        let exceeds = |(amp, freq): (f64, f64)| amplitude_px > amp && frequency_hz > freq;

        if exceeds(t.severe) {
            Severity::Severe
        } else if exceeds(t.moderate) {
            Severity::Moderate
        } else if exceeds(t.mild) {
            Severity::Mild
        } else {
            Severity::None
        }
    }
}

fn frequency(micro: &[MicroMovement], now_ms: u64) -> f64 {
    if micro.len() < 2 {
        return 0.0;
    }
    micro
        .iter()
        .filter(|m| now_ms.saturating_sub(m.timestamp_ms) < FREQUENCY_WINDOW_MS)
        .count() as f64
}

fn amplitude(micro: &[MicroMovement]) -> f64 {
    if micro.is_empty() {
        return 0.0;
    }
    micro.iter().map(|m| m.distance).sum::<f64>() / micro.len() as f64
}

/// Padding multiplier used when sizing adapts to the learned tremor.
pub fn sizing_factor(severity: Severity) -> f64 {
    match severity {
        Severity::Unknown | Severity::None => 1.0,
        Severity::Mild => 1.15,
        Severity::Moderate => 1.3,
        Severity::Severe => 1.5,
    }
}

/// Fraction of the cursor-to-target offset used for snapping.
pub fn snap_strength(severity: Severity) -> f64 {
    match severity {
        Severity::Unknown | Severity::None => 0.2,
        Severity::Mild => 0.3,
        Severity::Moderate => 0.4,
        Severity::Severe => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::CursorSample;
    use rstest::rstest;

    /// Zig-zag of `step` px every `gap` ms.
    fn jitter(n: usize, step: f64, gap: u64) -> CursorHistory {
        CursorHistory::from_samples(
            n,
            (0..n).map(|i| {
                let x = if i % 2 == 0 { 0.0 } else { step };
                CursorSample::new(x, 0.0, i as u64 * gap)
            }),
        )
    }

    #[test]
    fn test_short_history_is_unknown() {
        let analyzer = TremorAnalyzer::default();
        for n in 0..MIN_SAMPLES {
            let profile = analyzer.analyze(&jitter(n.max(1), 6.0, 20));
            assert_eq!(profile, TremorProfile::UNKNOWN);
        }
    }

    #[test]
    fn test_steady_hand_is_none() {
        let h = CursorHistory::from_samples(
            10,
            (0..10).map(|i| CursorSample::new(100.0, 100.0, i * 30)),
        );
        let profile = TremorAnalyzer::default().analyze(&h);
        assert_eq!(profile.severity, Severity::None);
        assert_eq!(profile.amplitude_px, 0.0);
        assert_eq!(profile.frequency_hz, 0.0);
    }

    #[test]
    fn test_fast_travel_is_not_micro() {
        let h = CursorHistory::from_samples(
            10,
            (0..10).map(|i| CursorSample::new(i as f64 * 40.0, 0.0, i * 16)),
        );
        let analyzer = TremorAnalyzer::default();
        assert!(analyzer.micro_movements(&h).is_empty());
        assert_eq!(analyzer.analyze(&h).severity, Severity::None);
    }

    #[rstest]
    #[case(6.0, Severity::Severe)]
    #[case(4.0, Severity::Moderate)]
    #[case(2.0, Severity::Mild)]
    #[case(0.5, Severity::None)]
    fn test_severity_from_amplitude(#[case] step: f64, #[case] expected: Severity) {
        // 9 micro steps within the last second -> frequency 9
        let profile = TremorAnalyzer::default().analyze(&jitter(10, step, 30));
        assert_eq!(profile.frequency_hz, 9.0);
        assert!((profile.amplitude_px - step).abs() < 1e-9);
        assert_eq!(profile.severity, expected);
    }

    #[test]
    fn test_frequency_window_excludes_old_steps() {
        let mut samples: Vec<CursorSample> = (0..6)
            .map(|i| CursorSample::new((i % 2) as f64 * 4.0, 0.0, i * 50))
            .collect();
        // a long pause, then four more jittery samples
        for i in 0..4u64 {
            samples.push(CursorSample::new(((i + 1) % 2) as f64 * 4.0, 0.0, 5000 + i * 50));
        }
        let h = CursorHistory::from_samples(10, samples);
        let profile = TremorAnalyzer::default().analyze(&h);
        assert_eq!(profile.frequency_hz, 3.0);
        // amplitude 4 with only three recent steps: not enough for severe
        assert_eq!(profile.severity, Severity::Moderate);
    }

    #[test]
    fn test_adaptation_curves_are_monotonic() {
        let order = [
            Severity::None,
            Severity::Mild,
            Severity::Moderate,
            Severity::Severe,
        ];
        for pair in order.windows(2) {
            assert!(sizing_factor(pair[0]) < sizing_factor(pair[1]));
            assert!(snap_strength(pair[0]) < snap_strength(pair[1]));
        }
    }
}
