use crate::config::AssistanceConfig;
use crate::stats::{SessionStats, TremorProfile};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

/// Keys of the extension's local storage area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum StorageKey {
    Enabled,
    Sensitivity,
    VisualFeedback,
    AutoAdapt,
    MotorImpaired,
    VisualImpaired,
    VisualImpairedScale,
    Stats,
    UserTremorPattern,
    TutorialCompleted,
}

/// Everything read at session start. Missing keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(flatten)]
    pub config: AssistanceConfig,
    pub stats: SessionStats,
    pub user_tremor_pattern: TremorProfile,
    pub tutorial_completed: bool,
}

/// A single write to storage, as issued by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageWrite {
    Stats(SessionStats),
    UserTremorPattern(TremorProfile),
    Config(AssistanceConfig),
}

impl StorageWrite {
    pub fn keys(&self) -> &'static [StorageKey] {
        match self {
            Self::Stats(_) => &[StorageKey::Stats],
            Self::UserTremorPattern(_) => &[StorageKey::UserTremorPattern],
            Self::Config(_) => &[
                StorageKey::Enabled,
                StorageKey::Sensitivity,
                StorageKey::VisualFeedback,
                StorageKey::AutoAdapt,
                StorageKey::MotorImpaired,
                StorageKey::VisualImpaired,
                StorageKey::VisualImpairedScale,
            ],
        }
    }

    pub fn apply_to(&self, state: &mut PersistedState) {
        match self {
            Self::Stats(stats) => state.stats = stats.clone(),
            Self::UserTremorPattern(profile) => state.user_tremor_pattern = *profile,
            Self::Config(config) => state.config = config.clone(),
        }
    }
}
