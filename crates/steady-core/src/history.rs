use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LENGTH: usize = 10;

/// One pointer-move observation. Never mutated after it is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorSample {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: u64,
}

impl CursorSample {
    pub const fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self { x, y, timestamp_ms }
    }
}

/// Fixed-length rolling log of cursor samples, oldest first.
#[derive(Debug, Clone)]
pub struct CursorHistory {
    samples: VecDeque<CursorSample>,
    capacity: usize,
}

impl Default for CursorHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LENGTH)
    }
}

impl CursorHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn from_samples(capacity: usize, samples: impl IntoIterator<Item = CursorSample>) -> Self {
        let mut history = Self::new(capacity);
        for s in samples {
            history.record(s);
        }
        history
    }

    /// Appends a sample, evicting the oldest once the buffer is full.
    pub fn record(&mut self, sample: CursorSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// The last `k` samples in chronological order, or `None` when fewer exist.
    pub fn recent(&self, k: usize) -> Option<Vec<CursorSample>> {
        if k > self.samples.len() {
            return None;
        }
        Some(self.samples.iter().skip(self.samples.len() - k).copied().collect())
    }

    /// Up to `k` of the newest samples, fewer if the buffer is short.
    pub fn tail(&self, k: usize) -> Vec<CursorSample> {
        let k = k.min(self.samples.len());
        self.recent(k).unwrap_or_default()
    }

    pub fn latest(&self) -> Option<&CursorSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CursorSample> + '_ {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<CursorSample> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: u64) -> CursorHistory {
        let mut h = CursorHistory::new(10);
        for i in 0..n {
            h.record(CursorSample::new(i as f64, 0.0, i * 16));
        }
        h
    }

    #[test]
    fn test_evicts_oldest_first() {
        let h = filled(13);
        assert_eq!(h.len(), 10);
        assert_eq!(h.iter().next().unwrap().x, 3.0);
        assert_eq!(h.latest().unwrap().x, 12.0);
    }

    #[test]
    fn test_recent_is_chronological() {
        let h = filled(6);
        let last3 = h.recent(3).unwrap();
        let xs: Vec<f64> = last3.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_recent_fails_when_short() {
        let h = filled(2);
        assert!(h.recent(3).is_none());
        assert_eq!(h.recent(0).unwrap().len(), 0);
        assert_eq!(h.tail(5).len(), 2);
    }
}
