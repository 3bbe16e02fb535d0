use crate::components::YawRateControllerTuning;

/// Normalized yaw torque command that drives the body towards the yaw rate
/// requested by the pedals.
///
/// `desired` is the filtered pedal input in [-1, 1] and maps linearly onto
/// `[-max_rate_rad, max_rate_rad]`. The result is the rate error scaled by the
/// damping gain, clamped to [-1, 1].
pub fn compute_yaw_rate_command(
    desired: f32,
    current_rate: f32,
    tuning: &YawRateControllerTuning,
) -> f32 {
    let target_rate = desired.clamp(-1.0, 1.0) * tuning.max_rate_rad;
    let command = ((target_rate - current_rate) * tuning.damping).clamp(-1.0, 1.0);

    if command.is_nan() {
        0.0
    } else {
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tuning() -> YawRateControllerTuning {
        YawRateControllerTuning {
            max_rate_rad: 2.0,
            damping: 0.8,
        }
    }

    #[test]
    fn test_command_is_bounded() {
        let tuning = tuning();
        assert_eq!(compute_yaw_rate_command(1.0, -5.0, &tuning), 1.0);
        assert_eq!(compute_yaw_rate_command(-1.0, 5.0, &tuning), -1.0);
        assert_eq!(compute_yaw_rate_command(40.0, 0.0, &tuning), 1.0);
    }

    #[test]
    fn test_zero_at_target_rate() {
        let tuning = tuning();
        assert_relative_eq!(compute_yaw_rate_command(0.5, 1.0, &tuning), 0.0);
        assert_relative_eq!(compute_yaw_rate_command(-0.25, -0.5, &tuning), 0.0);
    }

    #[test]
    fn test_proportional_region() {
        let tuning = tuning();
        // target 0.4 rad/s, error 0.4, gain 0.8
        assert_relative_eq!(compute_yaw_rate_command(0.2, 0.0, &tuning), 0.32);
        // opposing spin is damped
        assert_relative_eq!(compute_yaw_rate_command(0.0, 0.5, &tuning), -0.4);
    }

    #[test]
    fn test_nan_yields_zero() {
        let tuning = tuning();
        assert_eq!(compute_yaw_rate_command(0.5, f32::NAN, &tuning), 0.0);
    }
}
