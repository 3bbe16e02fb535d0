use approx::assert_relative_eq;

use crate::common::{create_direct_config, TestSimBuilder};

#[test]
fn test_assist_toggles() {
    let mut sim = TestSimBuilder::new().build();
    let assists = sim.sim.world.player.assists;
    assert!(assists.stability);
    assert!(!assists.hover);

    sim.tap("KeyZ");
    sim.tap("KeyX");
    let assists = sim.sim.world.player.assists;
    assert!(!assists.stability);
    assert!(assists.hover);

    // A held key toggles only once.
    sim.press("KeyX");
    sim.run_steps(20);
    sim.release("KeyX");
    assert!(!sim.sim.world.player.assists.hover);
}

#[test]
fn test_pulses_last_one_step() {
    let mut sim = TestSimBuilder::new().build();
    sim.press("KeyZ");
    sim.run_steps(1);
    assert!(sim.sim.world.input.toggle_stability);

    sim.run_steps(1);
    assert!(!sim.sim.world.input.toggle_stability);
    assert!(!sim.sim.world.input.any_pulse());
}

#[test]
fn test_opposing_keys_cancel() {
    let mut sim = TestSimBuilder::new().with_config(create_direct_config()).build();
    sim.press("KeyR");
    sim.press("PageDown");
    sim.run_steps(30);

    assert_eq!(sim.sim.world.input.collective, 0.0);
    assert_eq!(sim.sim.world.player.control.collective.raw, 0.0);
    assert!(sim.altimeter().is_grounded);
}

#[test]
fn test_force_and_reset_trim() {
    let mut sim = TestSimBuilder::new().with_config(create_direct_config()).build();
    sim.press("KeyD");
    sim.run_steps(2);

    sim.tap("KeyT");
    assert_relative_eq!(sim.sim.world.player.control.trim.cyclic_x, 1.0);
    assert_relative_eq!(sim.sim.world.player.control.trim.cyclic_y, 0.0);

    sim.release("KeyD");
    sim.tap("KeyY");
    assert_eq!(sim.sim.world.player.control.trim.cyclic_x, 0.0);
}

#[test]
fn test_normal_preset_smooths_collective() {
    let mut sim = TestSimBuilder::new().build();
    sim.press("KeyR");
    sim.run_steps(1);

    let collective = sim.sim.world.player.control.collective;
    assert_eq!(collective.raw, 1.0);
    assert!(collective.filtered > 0.0 && collective.filtered < 0.1);
}
