use bevy::log::{debug, info};
use nalgebra::Vector3;
use rapier3d::prelude::{ColliderBuilder, RigidBody, RigidBodyBuilder, RigidBodyType};

use crate::components::{
    is_trim_active, GameState, HelicopterAssists, HelicopterFlightTuning, PlayerHelicopter,
    PlayerInputState, YawRateControllerTuning, HELICOPTER_HULL_HALF_EXTENTS,
};
use crate::ecs::{FixedStepContext, Result, System, SystemPhase};
use crate::physics::{PhysicsError, PhysicsWorld};
use crate::systems::controller::compute_yaw_rate_command;
use crate::systems::propulsion::{authority_scale, rpm_scale, update_power_state};
use crate::utils::{body_up, clamp01};
use crate::world::SimWorld;

/// Default spawn height of the hull center [m]
pub const DEFAULT_SPAWN_HEIGHT: f32 = 0.8;

/// Stick deflection below which an axis counts as centered
const INPUT_ACTIVE_THRESHOLD: f32 = 0.01;

pub fn default_spawn_position() -> Vector3<f32> {
    Vector3::new(0.0, DEFAULT_SPAWN_HEIGHT, 0.0)
}

/// Creates the player airframe: a CCD-enabled dynamic body carrying a single
/// box hull.
pub fn spawn_player_helicopter(
    physics: &mut PhysicsWorld,
    flight: HelicopterFlightTuning,
    yaw_rate: YawRateControllerTuning,
    position: Vector3<f32>,
) -> std::result::Result<PlayerHelicopter, PhysicsError> {
    let entity = physics.spawn_entity();

    let body = RigidBodyBuilder::dynamic()
        .translation(position)
        .ccd_enabled(true)
        .linear_damping(flight.linear_damping)
        .angular_damping(flight.angular_damping)
        .build();
    let body = physics.create_rigid_body_for_entity(entity, body)?;

    let hull = HELICOPTER_HULL_HALF_EXTENTS;
    let collider = ColliderBuilder::cuboid(hull.x, hull.y, hull.z)
        .density(flight.density)
        .build();
    physics.create_collider_for_entity(entity, collider, Some(body))?;

    info!(
        "Spawned player helicopter {} at ({:.1}, {:.1}, {:.1})",
        entity, position.x, position.y, position.z
    );

    Ok(PlayerHelicopter::new(entity, body, flight, yaw_rate))
}

/// Switches the body between kinematic (paused) and dynamic (running).
///
/// Returns true when flight forces should be applied this step.
pub fn apply_pause_state(body: &mut RigidBody, paused: bool, flight: &HelicopterFlightTuning) -> bool {
    if paused {
        if body.body_type() != RigidBodyType::KinematicPositionBased {
            body.set_body_type(RigidBodyType::KinematicPositionBased, true);
        }
        return false;
    }

    if body.body_type() != RigidBodyType::Dynamic {
        body.set_body_type(RigidBodyType::Dynamic, true);

        let translation = *body.translation();
        if translation.y < flight.unpause_min_height {
            body.set_translation(
                Vector3::new(translation.x, flight.unpause_reset_height, translation.z),
                true,
            );
            body.set_linvel(Vector3::zeros(), true);
            body.set_angvel(Vector3::zeros(), true);
        }
    }
    true
}

fn apply_rotor_lift(body: &mut RigidBody, heli: &PlayerHelicopter) {
    let collective = heli.control.collective;
    if collective.raw == 0.0 {
        return;
    }

    let lift = if collective.raw > 0.0 {
        clamp01(collective.filtered)
    } else {
        -clamp01(collective.filtered.abs())
    };

    let magnitude = lift * heli.flight.max_lift_force * rpm_scale(&heli.power, &heli.flight);
    let direction = body_up(body.rotation());
    body.add_force(direction * magnitude, true);
    body.wake_up(true);
}

/// Bleeds climb rate while the collective is neutral or lowered.
fn apply_collective_brake(body: &mut RigidBody, heli: &PlayerHelicopter) {
    let raw = heli.control.collective.raw;
    let linvel = *body.linvel();
    if raw > 0.0 || linvel.y <= 0.0 {
        return;
    }

    let flight = &heli.flight;
    let reduction = flight.collective_brake_neutral_bleed + clamp01(-raw) * flight.collective_brake_max;
    let factor = (1.0 - reduction).max(flight.collective_brake_min_factor);
    body.set_linvel(Vector3::new(linvel.x, linvel.y * factor, linvel.z), true);
}

fn has_raw_rotation_input(heli: &PlayerHelicopter) -> bool {
    let control = &heli.control;
    control.cyclic_x.raw.abs() > INPUT_ACTIVE_THRESHOLD
        || control.cyclic_y.raw.abs() > INPUT_ACTIVE_THRESHOLD
        || control.yaw.raw.abs() > INPUT_ACTIVE_THRESHOLD
}

fn has_filtered_rotation_input(heli: &PlayerHelicopter) -> bool {
    let control = &heli.control;
    control.cyclic_x.filtered.abs() > INPUT_ACTIVE_THRESHOLD
        || control.cyclic_y.filtered.abs() > INPUT_ACTIVE_THRESHOLD
        || control.yaw.filtered.abs() > INPUT_ACTIVE_THRESHOLD
}

/// Pitch, yaw and roll torques from the cyclic and the yaw-rate loop, in
/// world axes, scaled by the remaining power authority.
fn apply_control_torques(body: &mut RigidBody, heli: &PlayerHelicopter) {
    // Filtered residue and trim alone would fight the stability assist.
    if !has_raw_rotation_input(heli) {
        return;
    }

    let flight = &heli.flight;
    let control = &heli.control;
    let scale = authority_scale(&heli.power, flight) * rpm_scale(&heli.power, flight);
    let yaw_command = compute_yaw_rate_command(control.yaw.filtered, body.angvel().y, &heli.yaw_rate);

    let torque = Vector3::new(
        -control.cyclic_y.filtered * flight.max_pitch_torque,
        yaw_command * flight.max_yaw_torque,
        -control.cyclic_x.filtered * flight.max_roll_torque,
    ) * scale;
    body.add_torque(torque, true);
}

fn apply_stability_assist(body: &mut RigidBody, heli: &PlayerHelicopter) {
    if !heli.assists.stability {
        return;
    }

    let flight = &heli.flight;
    let angvel = *body.angvel() * flight.stability_angular_damping;
    body.set_angvel(angvel, true);

    if has_filtered_rotation_input(heli) || is_trim_active(&heli.control.trim) {
        return;
    }

    let max_torque = Vector3::new(flight.max_pitch_torque, flight.max_yaw_torque, flight.max_roll_torque);
    let counter = -angvel.component_mul(&max_torque) * flight.stability_counter_torque_scale;
    body.add_torque(counter, true);

    let up = body_up(body.rotation());
    if up.x.hypot(up.z) > flight.stability_leveling_deadzone {
        let scale = flight.stability_leveling_torque_scale
            * authority_scale(&heli.power, flight)
            * rpm_scale(&heli.power, flight);
        let leveling = Vector3::new(-up.z * flight.max_pitch_torque, 0.0, up.x * flight.max_roll_torque) * scale;
        body.add_torque(leveling, true);
    }
}

fn apply_hover_assist(body: &mut RigidBody, heli: &PlayerHelicopter) {
    if !heli.assists.hover {
        return;
    }

    let flight = &heli.flight;
    let collective = heli.control.collective.filtered;
    if collective < flight.hover_band_min || collective > flight.hover_band_max {
        return;
    }

    let linvel = *body.linvel();
    body.set_linvel(
        Vector3::new(
            linvel.x * flight.hover_lateral_damping,
            linvel.y,
            linvel.z * flight.hover_lateral_damping,
        ),
        true,
    );
}

/// One unpaused flight step: power, lift, brake, torques, then assists.
pub fn step_helicopter_flight(body: &mut RigidBody, heli: &mut PlayerHelicopter, dt: f32) {
    let speed = body.linvel().norm();
    update_power_state(&mut heli.power, &heli.control, speed, &heli.flight, dt);

    apply_rotor_lift(body, heli);
    apply_collective_brake(body, heli);
    apply_control_torques(body, heli);
    apply_stability_assist(body, heli);
    apply_hover_assist(body, heli);
}

pub fn toggle_assists(assists: &mut HelicopterAssists, input: &PlayerInputState) {
    if input.toggle_stability {
        assists.stability = !assists.stability;
        debug!("Stability assist {}", if assists.stability { "on" } else { "off" });
    }
    if input.toggle_hover {
        assists.hover = !assists.hover;
        debug!("Hover assist {}", if assists.hover { "on" } else { "off" });
    }
}

pub struct AssistToggleSystem;

impl System<SimWorld> for AssistToggleSystem {
    fn id(&self) -> &str {
        "sim.assist_toggle"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Simulation
    }

    fn run(&mut self, _ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        toggle_assists(&mut world.player.assists, &world.input);
        Ok(())
    }
}

pub fn toggle_pause(state: &mut GameState, input: &PlayerInputState) {
    if input.toggle_pause {
        state.is_paused = !state.is_paused;
        info!("Simulation {}", if state.is_paused { "paused" } else { "resumed" });
    }
}

pub struct PauseToggleSystem;

impl System<SimWorld> for PauseToggleSystem {
    fn id(&self) -> &str {
        "sim.pause_toggle"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Simulation
    }

    fn run(&mut self, _ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        toggle_pause(&mut world.game_state, &world.input);
        Ok(())
    }
}

/// Applies rotor forces and assists to the player body ahead of the physics step.
pub struct HelicopterFlightSystem;

impl System<SimWorld> for HelicopterFlightSystem {
    fn id(&self) -> &str {
        "sim.helicopter_flight"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Simulation
    }

    fn run(&mut self, ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        let heli = &mut world.player;
        let body = world
            .physics
            .body_mut(heli.body)
            .ok_or(PhysicsError::MissingBody(heli.entity))?;

        if apply_pause_state(body, world.game_state.is_paused, &heli.flight) {
            step_helicopter_flight(body, heli, ctx.fixed_delta_seconds);
        }
        Ok(())
    }
}
