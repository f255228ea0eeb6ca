use clap::{parser::ValueSource, ArgAction, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MIN_SENSITIVITY: u8 = 1;
pub const MAX_SENSITIVITY: u8 = 5;
pub const MIN_VISUAL_SCALE: f64 = 1.0;
pub const MAX_VISUAL_SCALE: f64 = 2.0;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub assist: AssistanceConfig,
    #[command(flatten)]
    pub timing: TimingParams,
    #[command(flatten)]
    pub sizing: SizingParams,
}

/// User-facing switches. Field names double as the persisted storage keys.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistanceConfig {
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub enabled: bool,
    #[arg(long, default_value_t = 3)]
    pub sensitivity: u8,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub visual_feedback: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub auto_adapt: bool,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub motor_impaired: bool,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub visual_impaired: bool,
    #[arg(long, default_value_t = 2.0)]
    pub visual_impaired_scale: f64,
}

impl Default for AssistanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitivity: 3,
            visual_feedback: true,
            auto_adapt: true,
            motor_impaired: false,
            visual_impaired: false,
            visual_impaired_scale: 2.0,
        }
    }
}

impl AssistanceConfig {
    /// Clamps every option into its supported range. Never rejects.
    pub fn normalized(mut self) -> Self {
        self.sensitivity = clamp_sensitivity(self.sensitivity);
        self.visual_impaired_scale = clamp_visual_scale(self.visual_impaired_scale);
        self
    }
}

pub fn clamp_sensitivity(value: u8) -> u8 {
    value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}

pub fn clamp_visual_scale(value: f64) -> f64 {
    if value.is_nan() {
        return MAX_VISUAL_SCALE;
    }
    value.clamp(MIN_VISUAL_SCALE, MAX_VISUAL_SCALE)
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingParams {
    // Divided by the effective sensitivity
    #[arg(long, default_value_t = 1500)]
    pub hesitation_threshold_ms: u64,
    #[arg(long, default_value_t = 3000)]
    pub auto_restore_ms: u64,
    #[arg(long, default_value_t = 200)]
    pub click_restore_ms: u64,
    #[arg(long, default_value_t = 500)]
    pub leave_restore_ms: u64,
    #[arg(long, default_value_t = 10_000)]
    pub inactivity_ms: u64,
    #[arg(long, default_value_t = 1000)]
    pub prediction_cooldown_ms: u64,
    #[arg(long, default_value_t = 0.95)]
    pub confidence_decay: f64,
    #[arg(long, default_value_t = 5)]
    pub confidence_step: u8,

    // Pixels per second, below this movement counts as "slow"
    #[arg(long, default_value_t = 100.0)]
    pub speed_threshold: f64,
    #[arg(long, default_value_t = 10)]
    pub history_length: usize,
    #[arg(long, default_value_t = 5)]
    pub tremor_interval: usize,
    #[arg(long, default_value_t = 10)]
    pub tremor_persist_every: u64,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            hesitation_threshold_ms: 1500,
            auto_restore_ms: 3000,
            click_restore_ms: 200,
            leave_restore_ms: 500,
            inactivity_ms: 10_000,
            prediction_cooldown_ms: 1000,
            confidence_decay: 0.95,
            confidence_step: 5,
            speed_threshold: 100.0,
            history_length: 10,
            tremor_interval: 5,
            tremor_persist_every: 10,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingParams {
    #[arg(long, default_value_t = 8.0)]
    pub base_extra_padding: f64,
    #[arg(long, default_value_t = 2.0)]
    pub motor_padding_factor: f64,
    // Upper bound on (enlarged area / original area)
    #[arg(long, default_value_t = 3.0)]
    pub max_footprint_ratio: f64,
    #[arg(long, default_value_t = 100.0)]
    pub assistance_radius: f64,
    #[arg(long, default_value_t = 200.0)]
    pub dim_radius: f64,
    #[arg(long, default_value_t = 0.5)]
    pub max_dim: f64,
    #[arg(long, default_value_t = 12.0)]
    pub max_snap_px: f64,
}

impl Default for SizingParams {
    fn default() -> Self {
        Self {
            base_extra_padding: 8.0,
            motor_padding_factor: 2.0,
            max_footprint_ratio: 3.0,
            assistance_radius: 100.0,
            dim_radius: 200.0,
            max_dim: 0.5,
            max_snap_px: 12.0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file {:?}: {}", path.as_ref(), e))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config JSON: {}", e))?;

        Ok(config.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.assist = self.assist.normalized();
        self.timing.history_length = self.timing.history_length.max(3);
        self.timing.tremor_interval = self.timing.tremor_interval.max(1);
        self.timing.tremor_persist_every = self.timing.tremor_persist_every.max(1);
        self.timing.confidence_decay = self.timing.confidence_decay.clamp(0.0, 1.0);
        self.sizing.max_footprint_ratio = self.sizing.max_footprint_ratio.max(1.0);
        self.sizing.max_dim = self.sizing.max_dim.clamp(0.0, 1.0);
        self
    }

    /// Overlays values the user typed on the command line onto a file-loaded base.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(assist.enabled);
        update_if_present!(assist.sensitivity);
        update_if_present!(assist.visual_feedback);
        update_if_present!(assist.auto_adapt);
        update_if_present!(assist.motor_impaired);
        update_if_present!(assist.visual_impaired);
        update_if_present!(assist.visual_impaired_scale);

        update_if_present!(timing.hesitation_threshold_ms);
        update_if_present!(timing.auto_restore_ms);
        update_if_present!(timing.click_restore_ms);
        update_if_present!(timing.leave_restore_ms);
        update_if_present!(timing.inactivity_ms);
        update_if_present!(timing.prediction_cooldown_ms);
        update_if_present!(timing.confidence_decay);
        update_if_present!(timing.confidence_step);
        update_if_present!(timing.speed_threshold);
        update_if_present!(timing.history_length);
        update_if_present!(timing.tremor_interval);
        update_if_present!(timing.tremor_persist_every);

        update_if_present!(sizing.base_extra_padding);
        update_if_present!(sizing.motor_padding_factor);
        update_if_present!(sizing.max_footprint_ratio);
        update_if_present!(sizing.assistance_radius);
        update_if_present!(sizing.dim_radius);
        update_if_present!(sizing.max_dim);
        update_if_present!(sizing.max_snap_px);

        *self = self.clone().normalized();
    }
}
