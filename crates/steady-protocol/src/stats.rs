use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub const MAX_CONFIDENCE: u8 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionStats {
    pub assist_count: u64,
    pub click_count: u64,
    // 0..=100
    pub confidence_level: u8,
    pub successful_clicks: u64,
    pub missed_clicks: u64,
}

impl SessionStats {
    pub fn raise_confidence(&mut self, step: u8) {
        self.confidence_level = self.confidence_level.saturating_add(step).min(MAX_CONFIDENCE);
    }

    pub fn lower_confidence(&mut self, step: u8) {
        self.confidence_level = self.confidence_level.saturating_sub(step);
    }

    /// Fraction of assisted clicks that landed on the assisted element.
    /// `None` until at least one assisted click has been observed.
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.successful_clicks + self.missed_clicks;
        if total == 0 {
            return None;
        }
        Some(self.successful_clicks as f64 / total as f64)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    #[default]
    Unknown,
    None,
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TremorProfile {
    pub severity: Severity,
    #[serde(rename = "frequency", alias = "frequencyHz")]
    pub frequency_hz: f64,
    #[serde(rename = "amplitude", alias = "amplitudePx")]
    pub amplitude_px: f64,
}

impl TremorProfile {
    pub const UNKNOWN: TremorProfile = TremorProfile {
        severity: Severity::Unknown,
        frequency_hz: 0.0,
        amplitude_px: 0.0,
    };

    pub fn is_known(&self) -> bool {
        self.severity != Severity::Unknown
    }
}

impl Default for TremorProfile {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Why an element is currently assisted. Also the value of the DOM marker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssistReason {
    Hover,
    Hesitation,
    Predicted,
}
