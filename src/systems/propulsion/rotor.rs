use crate::components::{ControlState, HelicopterFlightTuning, HelicopterPowerState};
use crate::utils::{clamp01, lerp, sanitize};

/// Weight of pedal input in the maneuvering load relative to cyclic
const YAW_MANEUVER_WEIGHT: f32 = 0.6;

/// Upper bound on the lift multiplier from rotor overspeed
const MAX_RPM_SCALE: f32 = 1.1;

/// Advances the power balance and rotor RPM by one step.
///
/// Collective and maneuvering set the power demand, forward speed relieves
/// it, and the remaining margin pulls the rotor towards an RPM target with a
/// first-order lag.
pub fn update_power_state(
    power: &mut HelicopterPowerState,
    control: &ControlState,
    speed: f32,
    tuning: &HelicopterFlightTuning,
    dt: f32,
) {
    let collective_load = if control.collective.raw > 0.0 {
        clamp01(control.collective.filtered) * tuning.power_collective_scale
    } else {
        0.0
    };

    let cyclic = control.cyclic_x.filtered.hypot(control.cyclic_y.filtered);
    let maneuver_load = clamp01(cyclic + YAW_MANEUVER_WEIGHT * control.yaw.filtered.abs())
        * tuning.power_maneuver_scale;

    let speed_relief = if tuning.power_speed_reference > 0.0 {
        clamp01(sanitize(speed) / tuning.power_speed_reference) * tuning.power_speed_relief
    } else {
        0.0
    };

    let required = sanitize(collective_load + maneuver_load - speed_relief)
        .clamp(0.0, tuning.power_max_required.max(0.0));
    let available = tuning.power_available;
    let margin = available - required;

    power.power_required = required;
    power.power_available = available;
    power.power_margin = margin;

    let min_rpm = tuning.min_rotor_rpm;
    let max_rpm = tuning.max_rotor_rpm.max(min_rpm);
    let rpm_target =
        (tuning.nominal_rotor_rpm + margin * tuning.rpm_margin_to_target).clamp(min_rpm, max_rpm);

    let mut rpm = sanitize(power.rotor_rpm);
    if tuning.rpm_response > 0.0 {
        let blend = 1.0 - (-tuning.rpm_response * sanitize(dt).max(0.0)).exp();
        rpm += (rpm_target - rpm) * blend;
    }
    power.rotor_rpm = rpm.clamp(min_rpm, max_rpm);
}

/// Control authority left over by the power margin, in
/// `[min_authority_scale, 1]`.
pub fn authority_scale(power: &HelicopterPowerState, tuning: &HelicopterFlightTuning) -> f32 {
    if tuning.power_margin_for_full_authority <= 0.0 {
        return 1.0;
    }
    let ratio = clamp01(power.power_margin / tuning.power_margin_for_full_authority);
    lerp(tuning.min_authority_scale, 1.0, ratio)
}

/// Rotor speed relative to nominal.
pub fn rpm_scale(power: &HelicopterPowerState, tuning: &HelicopterFlightTuning) -> f32 {
    if tuning.nominal_rotor_rpm <= 0.0 {
        return 1.0;
    }
    (power.rotor_rpm / tuning.nominal_rotor_rpm).clamp(0.0, MAX_RPM_SCALE)
}
