use approx::assert_relative_eq;
use heliflight::{components::LandingState, systems::AvionicsAlert};
use nalgebra::Vector3;

use crate::common::{
    assert_landed, assert_position_near, assert_transform_valid, create_direct_config,
    create_pinned_world, TestSimBuilder,
};

#[test]
fn test_spawn_settles_and_lands() {
    let mut sim = TestSimBuilder::new().build();
    sim.run_seconds(2.0);

    let transform = sim.transform();
    assert_transform_valid(&transform);
    assert_relative_eq!(transform.translation.y, 0.6, epsilon = 0.1);
    assert_landed(&sim.altimeter());

    let readout = sim.avionics().readout.expect("Avionics readout missing");
    assert_eq!(readout.landing_state, LandingState::Landed);
    assert_eq!(sim.avionics().alert, None);
}

#[test]
fn test_full_collective_climbs() {
    let mut sim = TestSimBuilder::new().with_config(create_direct_config()).build();
    sim.run_steps(10);

    sim.press("KeyR");
    sim.run_seconds(3.0);

    let altimeter = sim.altimeter();
    assert!(altimeter.altitude > 3.0, "Altitude {} after climb", altimeter.altitude);
    assert!(altimeter.vertical_speed > 0.0);
    assert_eq!(altimeter.landing_state, LandingState::Airborne);
    assert!(!altimeter.is_grounded);

    let power = sim.sim.world.player.power;
    assert!(power.power_required > 0.5);
}

#[test]
fn test_yaw_input_turns_heading() {
    let mut sim = TestSimBuilder::new().with_config(create_direct_config()).build();
    sim.press("KeyR");
    assert!(sim.wait_for_condition(600, |s| s.altimeter().altitude > 3.0));

    let before = sim.altimeter().heading;
    sim.press("KeyE");
    sim.run_seconds(1.0);
    let after = sim.altimeter().heading;

    let turned = (after - before).rem_euclid(360.0);
    assert!(turned > 1.0 && turned < 180.0, "Heading went {} -> {}", before, after);
}

#[test]
fn test_pause_freezes_airframe() {
    let mut sim = TestSimBuilder::new().with_config(create_direct_config()).build();
    sim.press("KeyR");
    assert!(sim.wait_for_condition(600, |s| s.altimeter().altitude > 2.0));

    sim.tap("Space");
    assert!(sim.sim.world.game_state.is_paused);

    let frozen = sim.transform().translation;
    sim.run_seconds(1.0);
    assert_position_near(&sim.transform().translation, &frozen, 1e-4);

    sim.tap("Space");
    assert!(!sim.sim.world.game_state.is_paused);
    sim.run_steps(30);
    assert!(sim.transform().translation.y > frozen.y);
}

#[test]
fn test_hard_landing() {
    let mut sim = TestSimBuilder::new().with_world(create_pinned_world(-30.0, 0.0)).build();
    sim.run_steps(30);
    assert_landed(&sim.altimeter());

    sim.teleport(Vector3::new(-30.0, 2.8, 0.0));
    sim.run_steps(1);
    assert_eq!(sim.altimeter().landing_state, LandingState::Airborne);

    assert!(sim.wait_for_condition(180, |s| s.altimeter().is_grounded));
    let altimeter = sim.altimeter();
    assert_eq!(altimeter.landing_state, LandingState::HardLanding);
    assert!(altimeter.impact_severity >= 4.5 && altimeter.impact_severity < 8.0);
}

#[test]
fn test_crash_is_terminal() {
    let mut sim = TestSimBuilder::new().with_world(create_pinned_world(30.0, 0.0)).build();
    sim.run_steps(30);

    sim.teleport(Vector3::new(30.0, 8.0, 0.0));
    assert!(sim.wait_for_condition(120, |s| {
        s.avionics().alert == Some(AvionicsAlert::VrsSettling)
    }));

    assert!(sim.wait_for_condition(180, |s| s.altimeter().is_grounded));
    assert_eq!(sim.altimeter().landing_state, LandingState::Crashed);
    assert!(sim.altimeter().impact_severity >= 8.0);

    // Lifting off again does not clear a crash.
    sim.teleport(Vector3::new(30.0, 5.0, 0.0));
    sim.run_steps(1);
    assert!(!sim.altimeter().is_grounded);
    assert_eq!(sim.altimeter().landing_state, LandingState::Crashed);
}
