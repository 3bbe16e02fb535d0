use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::resources::errors::SimError;

/// Trim offsets below this magnitude count as centered
pub const TRIM_ACTIVE_THRESHOLD: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlAxisState {
    /// Clamped instantaneous input
    pub raw: f32,
    /// Output of the expo, trim, smoothing and slew chain
    pub filtered: f32,
}

/// Persistent neutral-stick offsets. Collective has none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlTrimState {
    pub cyclic_x: f32,
    pub cyclic_y: f32,
    pub yaw: f32,
}

impl ControlTrimState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub collective: ControlAxisState,
    pub cyclic_x: ControlAxisState,
    pub cyclic_y: ControlAxisState,
    pub yaw: ControlAxisState,
    pub trim: ControlTrimState,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn is_trim_active(trim: &ControlTrimState) -> bool {
    trim.cyclic_x.abs() > TRIM_ACTIVE_THRESHOLD
        || trim.cyclic_y.abs() > TRIM_ACTIVE_THRESHOLD
        || trim.yaw.abs() > TRIM_ACTIVE_THRESHOLD
}

/// Signal conditioning parameters for one control axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlAxisTuning {
    /// Exponent of the response curve. Values <= 1 give a linear response.
    pub expo: f32,
    /// Smoothing time constant [s]. Below 1 ms the target is taken instantly.
    pub smoothing_tau: f32,
    /// Maximum change of the filtered value [1/s]. Values <= 0 disable the limit.
    pub slew_rate: f32,
    /// Slew widening while the stick returns towards neutral. Ignored when absent or <= 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_slew_multiplier: Option<f32>,
}

impl ControlAxisTuning {
    pub const fn new(expo: f32, smoothing_tau: f32, slew_rate: f32) -> Self {
        Self {
            expo,
            smoothing_tau,
            slew_rate,
            release_slew_multiplier: None,
        }
    }

    pub const fn with_release(mut self, multiplier: f32) -> Self {
        self.release_slew_multiplier = Some(multiplier);
        self
    }

    /// Pass-through tuning: linear, unsmoothed, unlimited.
    pub const fn direct() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

/// Maps a normalized yaw command onto a physical yaw rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YawRateControllerTuning {
    /// Yaw rate commanded at full deflection [rad/s]
    pub max_rate_rad: f32,
    /// Feedback gain on the rate error
    pub damping: f32,
}

impl Default for YawRateControllerTuning {
    fn default() -> Self {
        Self {
            max_rate_rad: 1.6,
            damping: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlTuning {
    pub collective: ControlAxisTuning,
    pub cyclic_x: ControlAxisTuning,
    pub cyclic_y: ControlAxisTuning,
    pub yaw: ControlAxisTuning,
    #[serde(default)]
    pub yaw_rate: YawRateControllerTuning,
}

impl ControlTuning {
    pub fn normal() -> Self {
        let cyclic = ControlAxisTuning::new(1.6, 0.12, 4.5).with_release(2.0);
        Self {
            collective: ControlAxisTuning::new(1.2, 0.18, 1.6),
            cyclic_x: cyclic,
            cyclic_y: cyclic,
            yaw: ControlAxisTuning::new(1.8, 0.16, 3.5).with_release(2.0),
            yaw_rate: YawRateControllerTuning::default(),
        }
    }

    pub fn hardcore() -> Self {
        let cyclic = ControlAxisTuning::new(1.25, 0.08, 6.0).with_release(1.5);
        Self {
            collective: ControlAxisTuning::new(1.35, 0.1, 2.2),
            cyclic_x: cyclic,
            cyclic_y: cyclic,
            yaw: ControlAxisTuning::new(1.4, 0.12, 4.8).with_release(1.5),
            yaw_rate: YawRateControllerTuning::default(),
        }
    }

    /// Every axis passes input straight through. Handy for tests and replays.
    pub fn direct() -> Self {
        let axis = ControlAxisTuning::direct();
        Self {
            collective: axis,
            cyclic_x: axis,
            cyclic_y: axis,
            yaw: axis,
            yaw_rate: YawRateControllerTuning::default(),
        }
    }
}

impl Default for ControlTuning {
    fn default() -> Self {
        Self::normal()
    }
}

/// Named control feel presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPreset {
    /// Gentler curves and more smoothing
    #[default]
    Normal,
    /// Snappier response with less filtering
    Hardcore,
}

impl ControlPreset {
    pub fn tuning(self) -> ControlTuning {
        match self {
            ControlPreset::Normal => ControlTuning::normal(),
            ControlPreset::Hardcore => ControlTuning::hardcore(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlPreset::Normal => "normal",
            ControlPreset::Hardcore => "hardcore",
        }
    }
}

impl fmt::Display for ControlPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControlPreset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(ControlPreset::Normal),
            "hardcore" => Ok(ControlPreset::Hardcore),
            other => Err(SimError::UnknownPreset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trim_activity_threshold() {
        let mut trim = ControlTrimState::default();
        assert!(!is_trim_active(&trim));

        trim.yaw = 0.01;
        assert!(!is_trim_active(&trim));

        trim.cyclic_y = -0.02;
        assert!(is_trim_active(&trim));

        trim.reset();
        assert!(!is_trim_active(&trim));
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("normal".parse::<ControlPreset>().ok(), Some(ControlPreset::Normal));
        assert_eq!(" Hardcore ".parse::<ControlPreset>().ok(), Some(ControlPreset::Hardcore));
        assert!(matches!(
            "arcade".parse::<ControlPreset>(),
            Err(SimError::UnknownPreset(name)) if name == "arcade"
        ));
    }

    #[test]
    fn test_presets_differ_in_feel() {
        let normal = ControlPreset::Normal.tuning();
        let hardcore = ControlPreset::Hardcore.tuning();

        assert!(hardcore.cyclic_x.smoothing_tau < normal.cyclic_x.smoothing_tau);
        assert!(hardcore.cyclic_x.slew_rate > normal.cyclic_x.slew_rate);
        assert_eq!(normal.collective.release_slew_multiplier, None);
        assert_eq!(normal.yaw.release_slew_multiplier, Some(2.0));
    }

    #[test]
    fn test_preset_serde_names() {
        let yaml = serde_yaml::to_string(&ControlPreset::Hardcore).unwrap();
        assert_eq!(yaml.trim(), "hardcore");
    }
}
