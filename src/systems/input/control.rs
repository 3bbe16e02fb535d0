use crate::components::{ControlAxisState, ControlAxisTuning, ControlState, ControlTuning, PlayerInputState};
use crate::ecs::{FixedStepContext, Result, System, SystemPhase};
use crate::utils::sanitize;
use crate::world::SimWorld;

/// Smoothing time constants below this are treated as instant [s]
const MIN_SMOOTHING_TAU: f32 = 0.001;

/// Valid interval of a control axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    pub const SIGNED: AxisRange = AxisRange { min: -1.0, max: 1.0 };
    pub const UNIT: AxisRange = AxisRange { min: 0.0, max: 1.0 };

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn is_signed(&self) -> bool {
        self.min < 0.0
    }
}

/// Response curve `|x|^expo`, sign-preserving on signed axes.
pub fn apply_expo(value: f32, expo: f32, signed: bool) -> f32 {
    if expo <= 1.0 {
        return value;
    }
    if signed {
        value.signum() * value.abs().powf(expo)
    } else {
        value.max(0.0).powf(expo)
    }
}

fn apply_smoothing(current: f32, target: f32, dt: f32, tau: f32) -> f32 {
    if tau < MIN_SMOOTHING_TAU {
        return target;
    }
    let alpha = 1.0 - (-dt / tau).exp();
    current + alpha * (target - current)
}

/// True when moving from `current` to `target` brings the stick back towards neutral.
fn is_release(current: f32, target: f32) -> bool {
    if target == 0.0 {
        return current != 0.0;
    }
    current.signum() == target.signum() && target.abs() < current.abs()
}

fn apply_slew(current: f32, target: f32, dt: f32, tuning: &ControlAxisTuning) -> f32 {
    if tuning.slew_rate <= 0.0 {
        return target;
    }

    let mut rate = tuning.slew_rate;
    if let Some(multiplier) = tuning.release_slew_multiplier.filter(|m| *m > 1.0) {
        if is_release(current, target) {
            rate *= multiplier;
        }
    }

    let max_delta = rate * dt;
    current + (target - current).clamp(-max_delta, max_delta)
}

/// Runs one axis through clamp, expo, trim, smoothing and slew limiting.
pub fn update_axis(
    axis: &mut ControlAxisState,
    raw_input: f32,
    tuning: &ControlAxisTuning,
    dt: f32,
    range: AxisRange,
    trim: f32,
) {
    let raw = range.clamp(sanitize(raw_input));
    axis.raw = raw;

    let curved = apply_expo(raw, tuning.expo, range.is_signed());
    let target = range.clamp(curved + sanitize(trim));

    let smoothed = apply_smoothing(axis.filtered, target, dt, tuning.smoothing_tau);
    let filtered = apply_slew(axis.filtered, smoothed, dt, tuning);

    axis.filtered = if filtered.is_finite() { filtered } else { target };
}

/// Advances every axis by `dt` seconds. All axes, collective included, are
/// bidirectional; collective carries no trim.
pub fn update_control_state(
    state: &mut ControlState,
    input: &PlayerInputState,
    tuning: &ControlTuning,
    dt: f32,
) {
    let trim = state.trim;
    update_axis(&mut state.collective, input.collective, &tuning.collective, dt, AxisRange::SIGNED, 0.0);
    update_axis(&mut state.cyclic_x, input.cyclic_x, &tuning.cyclic_x, dt, AxisRange::SIGNED, trim.cyclic_x);
    update_axis(&mut state.cyclic_y, input.cyclic_y, &tuning.cyclic_y, dt, AxisRange::SIGNED, trim.cyclic_y);
    update_axis(&mut state.yaw, input.yaw, &tuning.yaw, dt, AxisRange::SIGNED, trim.yaw);
}

/// Reset clears the trim, force captures the current filtered stick as the
/// new neutral. Reset wins when both arrive together.
pub fn apply_trim_pulses(state: &mut ControlState, input: &PlayerInputState) {
    if input.reset_trim {
        state.trim.reset();
    } else if input.force_trim {
        state.trim.cyclic_x = state.cyclic_x.filtered;
        state.trim.cyclic_y = state.cyclic_y.filtered;
        state.trim.yaw = state.yaw.filtered;
    }
}

/// Filters the sampled input into the player's control state.
pub struct ControlStateSystem;

impl System<SimWorld> for ControlStateSystem {
    fn id(&self) -> &str {
        "input.control_state"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Input
    }

    fn run(&mut self, ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        let control = &mut world.player.control;
        update_control_state(control, &world.input, &world.control_tuning, ctx.fixed_delta_seconds);
        apply_trim_pulses(control, &world.input);
        Ok(())
    }
}
