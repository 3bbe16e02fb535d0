use serde::{Deserialize, Serialize};
use std::fmt;

/// Ground-contact classification. `Crashed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandingState {
    #[default]
    Airborne,
    Landed,
    HardLanding,
    Crashed,
}

impl LandingState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LandingState::Crashed)
    }
}

impl fmt::Display for LandingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LandingState::Airborne => "airborne",
            LandingState::Landed => "landed",
            LandingState::HardLanding => "hard_landing",
            LandingState::Crashed => "crashed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltimeterState {
    /// Height above ground [m]; infinite when no ground is found
    pub altitude: f32,
    /// [m/s], positive up
    pub vertical_speed: f32,
    /// [m/s]
    pub horizontal_speed: f32,
    /// [deg] in [0, 360)
    pub heading: f32,
    pub is_grounded: bool,
    pub landing_state: LandingState,
    /// Downward speed at the last touchdown [m/s]
    pub impact_severity: f32,
}

impl Default for AltimeterState {
    fn default() -> Self {
        Self {
            altitude: f32::INFINITY,
            vertical_speed: 0.0,
            horizontal_speed: 0.0,
            heading: 0.0,
            is_grounded: false,
            landing_state: LandingState::Airborne,
            impact_severity: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltimeterTuning {
    /// Altitude at or below which the body counts as on the ground [m]
    pub grounded_threshold: f32,
    pub max_ray_distance: f32,
    /// Touchdown speed at or below which a landing is clean [m/s]
    pub landed_speed: f32,
    /// Touchdown speed at or above which a landing is hard [m/s]
    pub hard_landing_speed: f32,
    /// Touchdown speed at or above which the aircraft is wrecked [m/s]
    pub crash_speed: f32,
}

impl Default for AltimeterTuning {
    fn default() -> Self {
        Self {
            grounded_threshold: 0.9,
            max_ray_distance: 2000.0,
            landed_speed: 0.8,
            hard_landing_speed: 4.5,
            crash_speed: 8.0,
        }
    }
}
