use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrsThresholds {
    pub enabled: bool,
    /// Sink rate at or above which the envelope is entered [m/s]
    pub min_descent_rate: f32,
    /// [m/s]
    pub max_forward_speed: f32,
    /// [m]
    pub max_altitude: f32,
}

impl Default for VrsThresholds {
    fn default() -> Self {
        Self {
            enabled: true,
            min_descent_rate: 6.0,
            max_forward_speed: 12.0,
            max_altitude: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvionicsAlertThresholds {
    pub power_margin_warning: f32,
    pub rotor_rpm_warning_ratio: f32,
    pub vrs: VrsThresholds,
}

impl Default for AvionicsAlertThresholds {
    fn default() -> Self {
        Self {
            power_margin_warning: 0.1,
            rotor_rpm_warning_ratio: 0.93,
            vrs: VrsThresholds::default(),
        }
    }
}

/// Horizontal waypoint shown on the navigation readout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub label: String,
    /// World (x, z)
    pub position: Vector2<f32>,
}

impl Default for NavigationTarget {
    fn default() -> Self {
        Self {
            label: "Waypoint".to_string(),
            position: Vector2::new(0.0, -20.0),
        }
    }
}
