use nalgebra::Vector3;
use rapier3d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

use super::{AltimeterState, ControlState, YawRateControllerTuning};
use crate::ecs::EntityId;

/// Collision hull half-extents of the player airframe [m]
pub const HELICOPTER_HULL_HALF_EXTENTS: Vector3<f32> = Vector3::new(1.2, 0.6, 2.5);

/// Airframe, assist and rotor power tuning for one helicopter archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelicopterFlightTuning {
    /// Collider density [kg/m^3]
    pub density: f32,
    /// Rotor thrust at full collective and nominal RPM [N]
    pub max_lift_force: f32,
    /// [N m]
    pub max_pitch_torque: f32,
    /// [N m]
    pub max_roll_torque: f32,
    /// [N m]
    pub max_yaw_torque: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,

    /// Per-step multiplier on angular velocity while stability assist is on
    pub stability_angular_damping: f32,
    pub stability_counter_torque_scale: f32,
    pub stability_leveling_torque_scale: f32,
    /// Tilt (horizontal length of the up vector) tolerated before leveling kicks in
    pub stability_leveling_deadzone: f32,

    pub hover_band_min: f32,
    pub hover_band_max: f32,
    /// Per-step multiplier on horizontal velocity inside the hover band
    pub hover_lateral_damping: f32,

    pub collective_brake_neutral_bleed: f32,
    pub collective_brake_max: f32,
    pub collective_brake_min_factor: f32,

    pub nominal_rotor_rpm: f32,
    pub min_rotor_rpm: f32,
    pub max_rotor_rpm: f32,
    /// Exponential response rate of rotor RPM [1/s]
    pub rpm_response: f32,
    /// RPM gained (or lost) per unit of power margin
    pub rpm_margin_to_target: f32,

    pub power_available: f32,
    pub power_collective_scale: f32,
    pub power_maneuver_scale: f32,
    /// Airspeed at which translational lift relief saturates [m/s]
    pub power_speed_reference: f32,
    pub power_speed_relief: f32,
    pub power_max_required: f32,
    pub min_authority_scale: f32,
    pub power_margin_for_full_authority: f32,

    /// Below this height a resumed body is lifted clear of the ground [m]
    pub unpause_min_height: f32,
    pub unpause_reset_height: f32,
}

impl Default for HelicopterFlightTuning {
    fn default() -> Self {
        Self {
            density: 20.0,
            max_lift_force: 4500.0,
            max_pitch_torque: 900.0,
            max_roll_torque: 300.0,
            max_yaw_torque: 800.0,
            linear_damping: 0.2,
            angular_damping: 1.4,

            stability_angular_damping: 0.94,
            stability_counter_torque_scale: 0.4,
            stability_leveling_torque_scale: 0.6,
            stability_leveling_deadzone: 0.02,

            hover_band_min: 0.3,
            hover_band_max: 0.7,
            hover_lateral_damping: 0.88,

            collective_brake_neutral_bleed: 0.02,
            collective_brake_max: 0.18,
            collective_brake_min_factor: 0.75,

            nominal_rotor_rpm: 400.0,
            min_rotor_rpm: 320.0,
            max_rotor_rpm: 440.0,
            rpm_response: 2.5,
            rpm_margin_to_target: 60.0,

            power_available: 0.9,
            power_collective_scale: 0.85,
            power_maneuver_scale: 0.35,
            power_speed_reference: 20.0,
            power_speed_relief: 0.15,
            power_max_required: 1.4,
            min_authority_scale: 0.45,
            power_margin_for_full_authority: 0.2,

            unpause_min_height: 0.5,
            unpause_reset_height: 0.8,
        }
    }
}

/// Rotor speed and power balance, updated once per simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelicopterPowerState {
    pub rotor_rpm: f32,
    pub power_required: f32,
    pub power_available: f32,
    pub power_margin: f32,
}

impl HelicopterPowerState {
    pub fn new(tuning: &HelicopterFlightTuning) -> Self {
        Self {
            rotor_rpm: tuning.nominal_rotor_rpm,
            power_required: 0.0,
            power_available: tuning.power_available,
            power_margin: tuning.power_available,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelicopterAssists {
    pub stability: bool,
    pub hover: bool,
}

impl Default for HelicopterAssists {
    fn default() -> Self {
        Self {
            stability: true,
            hover: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub is_paused: bool,
}

/// Everything the simulation derives for the player's aircraft.
///
/// The physics world owns pose and velocity; this owns tuning and the state
/// systems compute from them.
#[derive(Debug, Clone)]
pub struct PlayerHelicopter {
    pub entity: EntityId,
    pub body: RigidBodyHandle,
    pub flight: HelicopterFlightTuning,
    pub yaw_rate: YawRateControllerTuning,
    pub assists: HelicopterAssists,
    pub control: ControlState,
    pub altimeter: AltimeterState,
    pub power: HelicopterPowerState,
}

impl PlayerHelicopter {
    pub fn new(
        entity: EntityId,
        body: RigidBodyHandle,
        flight: HelicopterFlightTuning,
        yaw_rate: YawRateControllerTuning,
    ) -> Self {
        let power = HelicopterPowerState::new(&flight);
        Self {
            entity,
            body,
            flight,
            yaw_rate,
            assists: HelicopterAssists::default(),
            control: ControlState::new(),
            altimeter: AltimeterState::default(),
            power,
        }
    }
}
