use crate::stats::{SessionStats, TremorProfile};
use serde::{Deserialize, Serialize};

/// Commands sent by the settings UI or orchestration layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    ToggleAssistance { enabled: bool },
    UpdateSensitivity { sensitivity: u8 },
    UpdateVisualFeedback { enabled: bool },
    UpdateAutoAdapt { enabled: bool },
    UpdateMotorImpaired { enabled: bool },
    UpdateVisualImpaired { enabled: bool },
    UpdateVisualImpairedScale { value: f64 },
    ResetLearning {},
}

impl InboundMessage {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Notifications broadcast by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    StatsUpdate { stats: SessionStats },
    TremorUpdate { profile: TremorProfile },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_tags() {
        let msg = InboundMessage::from_json(r#"{"type":"UPDATE_SENSITIVITY","sensitivity":4}"#)
            .unwrap();
        assert_eq!(msg, InboundMessage::UpdateSensitivity { sensitivity: 4 });

        let msg = InboundMessage::from_json(r#"{"type":"RESET_LEARNING"}"#).unwrap();
        assert_eq!(msg, InboundMessage::ResetLearning {});

        let msg =
            InboundMessage::from_json(r#"{"type":"UPDATE_VISUAL_IMPAIRED_SCALE","value":1.5}"#)
                .unwrap();
        assert_eq!(msg, InboundMessage::UpdateVisualImpairedScale { value: 1.5 });
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(InboundMessage::from_json(r#"{"type":"DEMO_TOGGLE","enabled":true}"#).is_err());
    }

    #[test]
    fn test_stats_update_shape() {
        let msg = OutboundMessage::StatsUpdate {
            stats: SessionStats::default(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "STATS_UPDATE");
        assert_eq!(json["stats"]["confidenceLevel"], 0);
    }
}
