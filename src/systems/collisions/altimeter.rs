use bevy::log::{info, warn};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use rapier3d::prelude::RigidBodyHandle;

use crate::components::{AltimeterState, AltimeterTuning, LandingState};
use crate::ecs::{FixedStepContext, Result, System, SystemPhase};
use crate::physics::{PhysicsError, PhysicsWorld};
use crate::utils::{body_forward, heading_degrees, horizontal_length};
use crate::world::SimWorld;

/// Raw sensor inputs for one altimeter update.
#[derive(Debug, Clone, Copy)]
pub struct AltimeterSample {
    pub altitude: f32,
    pub linvel: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

/// Height above the first surface below `origin`.
///
/// A body sunk into the ground sees nothing below, so the ray is retried
/// upwards and the distance reported as negative. Returns infinity when both
/// rays miss.
pub fn measure_altitude(
    physics: &mut PhysicsWorld,
    origin: Vector3<f32>,
    max_distance: f32,
    exclude: Option<RigidBodyHandle>,
) -> f32 {
    let origin = Point3::from(origin);
    if let Some(toi) = physics.cast_ray(origin, -Vector3::y(), max_distance, exclude) {
        return toi;
    }
    match physics.cast_ray(origin, Vector3::y(), max_distance, exclude) {
        Some(toi) => -toi,
        None => f32::INFINITY,
    }
}

/// Maps a touchdown speed onto a landing state.
///
/// Touchdowns between the landed and hard-landing speeds are not recognised
/// as a landing and stay `Airborne` until the next touchdown edge.
pub fn classify_impact(severity: f32, tuning: &AltimeterTuning) -> LandingState {
    if severity >= tuning.crash_speed {
        LandingState::Crashed
    } else if severity >= tuning.hard_landing_speed {
        LandingState::HardLanding
    } else if severity <= tuning.landed_speed {
        LandingState::Landed
    } else {
        LandingState::Airborne
    }
}

/// Refreshes the sensor fields and advances the landing state machine.
///
/// Landing is only classified on the touchdown edge. A crash is final: later
/// updates keep the sensors live but leave the state alone.
pub fn update_altimeter(state: &mut AltimeterState, sample: &AltimeterSample, tuning: &AltimeterTuning) {
    let was_grounded = state.is_grounded;
    let is_grounded = sample.altitude <= tuning.grounded_threshold;

    state.altitude = sample.altitude;
    state.vertical_speed = sample.linvel.y;
    state.horizontal_speed = horizontal_length(&sample.linvel);
    state.heading = heading_degrees(&body_forward(&sample.rotation));
    state.is_grounded = is_grounded;

    if state.landing_state.is_terminal() {
        return;
    }

    let previous = state.landing_state;
    if is_grounded && !was_grounded {
        let severity = (-sample.linvel.y).max(0.0);
        state.impact_severity = severity;
        state.landing_state = classify_impact(severity, tuning);
    } else if !is_grounded {
        state.landing_state = LandingState::Airborne;
        state.impact_severity = 0.0;
    }

    if state.landing_state != previous {
        match state.landing_state {
            LandingState::Crashed => warn!("Crashed at {:.1} m/s", state.impact_severity),
            LandingState::HardLanding => warn!("Hard landing at {:.1} m/s", state.impact_severity),
            LandingState::Landed => info!("Landed at {:.1} m/s", state.impact_severity),
            LandingState::Airborne => info!("Airborne"),
        }
    }
}

pub struct AltimeterSystem;

impl System<SimWorld> for AltimeterSystem {
    fn id(&self) -> &str {
        "sim.altimeter"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::PostPhysics
    }

    fn run(&mut self, _ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        let heli = &mut world.player;
        let body = world
            .physics
            .body(heli.body)
            .ok_or(PhysicsError::MissingBody(heli.entity))?;
        let translation = *body.translation();
        let linvel = *body.linvel();
        let rotation = *body.rotation();

        let altitude = measure_altitude(
            &mut world.physics,
            translation,
            world.altimeter_tuning.max_ray_distance,
            Some(heli.body),
        );

        let sample = AltimeterSample {
            altitude,
            linvel,
            rotation,
        };
        update_altimeter(&mut heli.altimeter, &sample, &world.altimeter_tuning);
        Ok(())
    }
}
