use serde::{Deserialize, Serialize};

/// Axis values and one-tick pulses sampled from the input device.
///
/// Axes are in [-1, 1]. Pulses are true only on the step their key went down
/// and are overwritten on the next sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInputState {
    pub collective: f32,
    pub cyclic_x: f32,
    pub cyclic_y: f32,
    pub yaw: f32,

    pub toggle_stability: bool,
    pub toggle_hover: bool,
    pub toggle_pause: bool,
    pub reset_trim: bool,
    pub force_trim: bool,
}

impl PlayerInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn any_pulse(&self) -> bool {
        self.toggle_stability
            || self.toggle_hover
            || self.toggle_pause
            || self.reset_trim
            || self.force_trim
    }
}
