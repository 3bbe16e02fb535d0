use approx::assert_relative_eq;
use heliflight::{components::ControlPreset, SimulationConfig};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use crate::common::{create_bare_config, TestSimBuilder};

#[test]
fn test_yaml_config_bootstraps_identically() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = create_bare_config();
    config.control_preset = ControlPreset::Hardcore;
    config.seed = 1234;

    let temp_file = NamedTempFile::new()?;
    config.save(temp_file.path())?;
    let loaded = SimulationConfig::load(temp_file.path())?;
    assert_eq!(loaded, config);

    let original = TestSimBuilder::new().with_config(config).build();
    let reloaded = TestSimBuilder::new().with_config(loaded).build();
    assert_eq!(original.transform(), reloaded.transform());
    assert_eq!(
        reloaded.sim.world.control_tuning,
        heliflight::components::ControlTuning::hardcore()
    );
    Ok(())
}

#[test]
fn test_frame_driven_loop() {
    let mut sim = TestSimBuilder::new().build();

    // Stopped loops ignore frames.
    assert!(sim.sim.frame(0.0).is_none());

    sim.sim.start();
    assert!(sim.sim.frame(100.0).is_none());

    let metrics = sim.sim.frame(120.0).expect("Running loop reports metrics");
    assert_eq!(metrics.steps_executed, 1);
    assert_relative_eq!(metrics.frame_delta_ms, 20.0);
    assert_eq!(sim.sim.sim_loop.step_index(), 1);

    sim.sim.stop();
    assert!(sim.sim.frame(140.0).is_none());
    assert_eq!(sim.sim.sim_loop.step_index(), 1);
}

#[test]
fn test_long_frame_is_clamped() {
    let mut sim = TestSimBuilder::new().build();
    let metrics = sim.sim.advance(1000.0);

    let options = *sim.sim.sim_loop.options();
    assert_eq!(metrics.steps_executed, options.max_sub_steps);
    assert!(metrics.clamped_ms > 0.0);
    assert!(metrics.accumulator_ms < options.fixed_delta_ms);
    assert!(sim.transform().translation.y.is_finite());
}

#[test]
fn test_navigation_readout() {
    let mut sim = TestSimBuilder::new().build();
    sim.run_steps(1);

    let navigation = sim.avionics().navigation.clone().expect("Default target missing");
    assert_eq!(navigation.label, "Waypoint");
    assert!(navigation.distance > 0.0);
    assert!((0.0..360.0).contains(&navigation.bearing));

    let mut config = create_bare_config();
    config.navigation_target = None;
    let mut sim = TestSimBuilder::new().with_config(config).build();
    sim.run_steps(1);
    assert!(sim.avionics().navigation.is_none());
}
