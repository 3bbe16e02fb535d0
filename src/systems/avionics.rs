use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::components::{LandingState, PlayerHelicopter};
use crate::ecs::{FixedStepContext, Result, System, SystemPhase};
use crate::physics::PhysicsError;
use crate::resources::{AvionicsAlertThresholds, NavigationTarget};
use crate::utils::{body_forward, body_right, horizontal_length, normalize_degrees, rad_to_deg};
use crate::world::SimWorld;

/// Flight instrument snapshot of the player aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvionicsReadout {
    pub altitude: f32,
    pub vertical_speed: f32,
    pub horizontal_speed: f32,
    pub heading: f32,
    /// Nose-down positive [deg]
    pub pitch: f32,
    /// Right-wing-down positive [deg]
    pub roll: f32,
    pub landing_state: LandingState,
    pub is_grounded: bool,
    pub impact_severity: f32,
    pub rotor_rpm: f32,
    pub nominal_rotor_rpm: f32,
    pub power_required: f32,
    pub power_available: f32,
    pub power_margin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationReadout {
    pub label: String,
    /// [deg] in [0, 360), same convention as heading
    pub bearing: f32,
    /// Horizontal distance [m]
    pub distance: f32,
}

/// Caution alerts, declared from highest to lowest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvionicsAlert {
    PowerLimit,
    LowRotorRpm,
    VrsSettling,
}

impl AvionicsAlert {
    pub fn label(self) -> &'static str {
        match self {
            AvionicsAlert::PowerLimit => "POWER LIMIT",
            AvionicsAlert::LowRotorRpm => "LOW ROTOR RPM",
            AvionicsAlert::VrsSettling => "VRS / SETTLING",
        }
    }
}

impl fmt::Display for AvionicsAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Latest avionics output, refreshed at the end of every step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvionicsState {
    pub readout: Option<AvionicsReadout>,
    pub navigation: Option<NavigationReadout>,
    pub alert: Option<AvionicsAlert>,
}

/// Pitch and roll of a body orientation in degrees.
pub fn attitude_degrees(rotation: &UnitQuaternion<f32>) -> (f32, f32) {
    let forward = body_forward(rotation);
    let right = body_right(rotation);
    let pitch = -forward.y.atan2(horizontal_length(&forward));
    let roll = -right.y.atan2(horizontal_length(&right));
    (rad_to_deg(pitch), rad_to_deg(roll))
}

pub fn build_avionics_readout(heli: &PlayerHelicopter, rotation: &UnitQuaternion<f32>) -> AvionicsReadout {
    let (pitch, roll) = attitude_degrees(rotation);
    let altimeter = &heli.altimeter;
    let power = &heli.power;

    AvionicsReadout {
        altitude: altimeter.altitude,
        vertical_speed: altimeter.vertical_speed,
        horizontal_speed: altimeter.horizontal_speed,
        heading: altimeter.heading,
        pitch,
        roll,
        landing_state: altimeter.landing_state,
        is_grounded: altimeter.is_grounded,
        impact_severity: altimeter.impact_severity,
        rotor_rpm: power.rotor_rpm,
        nominal_rotor_rpm: heli.flight.nominal_rotor_rpm,
        power_required: power.power_required,
        power_available: power.power_available,
        power_margin: power.power_margin,
    }
}

pub fn build_navigation_readout(
    position: &Vector3<f32>,
    target: Option<&NavigationTarget>,
) -> Option<NavigationReadout> {
    let target = target?;
    let dx = target.position.x - position.x;
    let dz = target.position.y - position.z;

    Some(NavigationReadout {
        label: target.label.clone(),
        bearing: normalize_degrees(rad_to_deg(dx.atan2(dz))),
        distance: dx.hypot(dz),
    })
}

fn is_vrs_envelope(readout: &AvionicsReadout, thresholds: &AvionicsAlertThresholds) -> bool {
    let vrs = &thresholds.vrs;
    if !readout.vertical_speed.is_finite() || !readout.horizontal_speed.is_finite() {
        return false;
    }
    if !readout.altitude.is_finite() || readout.altitude > vrs.max_altitude {
        return false;
    }
    readout.vertical_speed <= -vrs.min_descent_rate && readout.horizontal_speed <= vrs.max_forward_speed
}

/// Every caution the readout currently triggers, in detection order.
pub fn build_avionics_alerts(
    readout: &AvionicsReadout,
    thresholds: &AvionicsAlertThresholds,
) -> Vec<AvionicsAlert> {
    let mut alerts = Vec::new();

    if readout.power_margin.is_finite() && readout.power_margin <= thresholds.power_margin_warning {
        alerts.push(AvionicsAlert::PowerLimit);
    }

    if readout.nominal_rotor_rpm > 0.0 {
        let ratio = readout.rotor_rpm / readout.nominal_rotor_rpm;
        if ratio.is_finite() && ratio <= thresholds.rotor_rpm_warning_ratio {
            alerts.push(AvionicsAlert::LowRotorRpm);
        }
    }

    if thresholds.vrs.enabled && is_vrs_envelope(readout, thresholds) {
        alerts.push(AvionicsAlert::VrsSettling);
    }

    alerts
}

pub fn select_priority_alert(alerts: &[AvionicsAlert]) -> Option<AvionicsAlert> {
    alerts.iter().copied().min()
}

/// Publishes readouts and the active caution after all physics work is done.
pub struct AvionicsSystem;

impl System<SimWorld> for AvionicsSystem {
    fn id(&self) -> &str {
        "ui.avionics"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Late
    }

    fn run(&mut self, _ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        let body = world
            .physics
            .body(world.player.body)
            .ok_or(PhysicsError::MissingBody(world.player.entity))?;

        let readout = build_avionics_readout(&world.player, body.rotation());
        let alerts = build_avionics_alerts(&readout, &world.alert_thresholds);

        world.avionics = AvionicsState {
            readout: Some(readout),
            navigation: build_navigation_readout(body.translation(), world.navigation_target.as_ref()),
            alert: select_priority_alert(&alerts),
        };
        Ok(())
    }
}
