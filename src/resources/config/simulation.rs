use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use super::avionics::{AvionicsAlertThresholds, NavigationTarget};
use crate::components::{AltimeterTuning, ControlPreset, ControlTuning, HelicopterFlightTuning};
use crate::ecs::FixedTimestepLoopOptions;
use crate::resources::errors::{require_finite, require_ordered, require_positive, Result};
use crate::resources::props::PropDressingConfig;
use crate::resources::world::WorldConfig;
use crate::systems::input::PlayerInputBindings;

/// Everything needed to bootstrap a session. Every section falls back to its
/// defaults when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub loop_options: FixedTimestepLoopOptions,
    pub control_preset: ControlPreset,
    /// Replaces the preset tuning when present
    pub controls: Option<ControlTuning>,
    pub bindings: PlayerInputBindings,
    pub helicopter: HelicopterFlightTuning,
    pub altimeter: AltimeterTuning,
    pub world: WorldConfig,
    pub props: PropDressingConfig,
    pub avionics: AvionicsAlertThresholds,
    pub navigation_target: Option<NavigationTarget>,
    pub seed: u64,
    /// Frames the headless runner renders before exiting
    pub max_frames: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            loop_options: FixedTimestepLoopOptions::default(),
            control_preset: ControlPreset::Normal,
            controls: None,
            bindings: PlayerInputBindings::default(),
            helicopter: HelicopterFlightTuning::default(),
            altimeter: AltimeterTuning::default(),
            world: WorldConfig::default(),
            props: PropDressingConfig::default(),
            avionics: AvionicsAlertThresholds::default(),
            navigation_target: Some(NavigationTarget::default()),
            seed: 42,
            max_frames: 600,
        }
    }
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn control_tuning(&self) -> ControlTuning {
        self.controls.unwrap_or_else(|| self.control_preset.tuning())
    }

    /// Rejects settings the fixed loop cannot run with, NaN included.
    pub fn validate(&self) -> Result<()> {
        self.loop_options.validate()?;
        self.world.validate()?;
        validate_controls(&self.control_tuning())?;
        validate_helicopter(&self.helicopter)?;
        validate_altimeter(&self.altimeter)?;

        let avionics = &self.avionics;
        require_finite("power_margin_warning", avionics.power_margin_warning)?;
        require_finite("rotor_rpm_warning_ratio", avionics.rotor_rpm_warning_ratio)?;
        require_finite("vrs.min_descent_rate", avionics.vrs.min_descent_rate)?;
        require_finite("vrs.max_forward_speed", avionics.vrs.max_forward_speed)?;
        require_finite("vrs.max_altitude", avionics.vrs.max_altitude)?;
        if let Some(target) = &self.navigation_target {
            require_finite("navigation_target.x", target.position.x)?;
            require_finite("navigation_target.z", target.position.y)?;
        }
        Ok(())
    }
}

fn validate_controls(tuning: &ControlTuning) -> Result<()> {
    let axes = [
        ("collective", &tuning.collective),
        ("cyclic_x", &tuning.cyclic_x),
        ("cyclic_y", &tuning.cyclic_y),
        ("yaw", &tuning.yaw),
    ];
    for (name, axis) in axes {
        require_finite(&format!("{name}.expo"), axis.expo)?;
        require_finite(&format!("{name}.smoothing_tau"), axis.smoothing_tau)?;
        require_finite(&format!("{name}.slew_rate"), axis.slew_rate)?;
        if let Some(multiplier) = axis.release_slew_multiplier {
            require_finite(&format!("{name}.release_slew_multiplier"), multiplier)?;
        }
    }
    require_finite("yaw_rate.max_rate_rad", tuning.yaw_rate.max_rate_rad)?;
    require_finite("yaw_rate.damping", tuning.yaw_rate.damping)
}

fn validate_helicopter(heli: &HelicopterFlightTuning) -> Result<()> {
    require_positive("density", heli.density)?;
    require_positive("nominal_rotor_rpm", heli.nominal_rotor_rpm)?;
    require_ordered("min_rotor_rpm", heli.min_rotor_rpm, "max_rotor_rpm", heli.max_rotor_rpm)?;
    require_ordered("hover_band_min", heli.hover_band_min, "hover_band_max", heli.hover_band_max)?;

    let fields = [
        ("max_lift_force", heli.max_lift_force),
        ("max_pitch_torque", heli.max_pitch_torque),
        ("max_roll_torque", heli.max_roll_torque),
        ("max_yaw_torque", heli.max_yaw_torque),
        ("linear_damping", heli.linear_damping),
        ("angular_damping", heli.angular_damping),
        ("stability_angular_damping", heli.stability_angular_damping),
        ("stability_counter_torque_scale", heli.stability_counter_torque_scale),
        ("stability_leveling_torque_scale", heli.stability_leveling_torque_scale),
        ("stability_leveling_deadzone", heli.stability_leveling_deadzone),
        ("hover_lateral_damping", heli.hover_lateral_damping),
        ("collective_brake_neutral_bleed", heli.collective_brake_neutral_bleed),
        ("collective_brake_max", heli.collective_brake_max),
        ("collective_brake_min_factor", heli.collective_brake_min_factor),
        ("rpm_response", heli.rpm_response),
        ("rpm_margin_to_target", heli.rpm_margin_to_target),
        ("power_available", heli.power_available),
        ("power_collective_scale", heli.power_collective_scale),
        ("power_maneuver_scale", heli.power_maneuver_scale),
        ("power_speed_reference", heli.power_speed_reference),
        ("power_speed_relief", heli.power_speed_relief),
        ("power_max_required", heli.power_max_required),
        ("min_authority_scale", heli.min_authority_scale),
        ("power_margin_for_full_authority", heli.power_margin_for_full_authority),
        ("unpause_min_height", heli.unpause_min_height),
        ("unpause_reset_height", heli.unpause_reset_height),
    ];
    for (name, value) in fields {
        require_finite(name, value)?;
    }
    Ok(())
}

fn validate_altimeter(altimeter: &AltimeterTuning) -> Result<()> {
    require_finite("grounded_threshold", altimeter.grounded_threshold)?;
    require_positive("max_ray_distance", altimeter.max_ray_distance)?;
    require_ordered(
        "landed_speed",
        altimeter.landed_speed,
        "hard_landing_speed",
        altimeter.hard_landing_speed,
    )?;
    require_ordered(
        "hard_landing_speed",
        altimeter.hard_landing_speed,
        "crash_speed",
        altimeter.crash_speed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::SimError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.control_tuning(), ControlTuning::normal());
        assert_eq!(config.world.spawn_zones.len(), 4);
    }

    #[test]
    fn test_config_save_load() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut config = SimulationConfig::default();
        config.control_preset = ControlPreset::Hardcore;
        config.helicopter.max_lift_force = 5200.0;
        config.seed = 7;

        let temp_file = NamedTempFile::new()?;
        config.save(temp_file.path())?;
        assert!(fs::metadata(temp_file.path()).is_ok());

        let loaded = SimulationConfig::load(temp_file.path())?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.control_tuning(), ControlTuning::hardcore());
        Ok(())
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: SimulationConfig =
            serde_yaml::from_str("control_preset: hardcore\nhelicopter:\n  rpm_response: 4.0\n").unwrap();
        assert_eq!(config.control_preset, ControlPreset::Hardcore);
        assert_eq!(config.helicopter.rpm_response, 4.0);
        assert_eq!(config.helicopter.nominal_rotor_rpm, 400.0);
        assert_eq!(config.loop_options, FixedTimestepLoopOptions::default());
    }

    #[test]
    fn test_from_json_with_override() {
        let json = r#"{
            "controls": {
                "collective": { "expo": 1.0, "smoothing_tau": 0.0, "slew_rate": 0.0 },
                "cyclic_x": { "expo": 1.0, "smoothing_tau": 0.0, "slew_rate": 0.0 },
                "cyclic_y": { "expo": 1.0, "smoothing_tau": 0.0, "slew_rate": 0.0 },
                "yaw": { "expo": 1.0, "smoothing_tau": 0.0, "slew_rate": 0.0 }
            },
            "seed": 99
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.control_tuning(), ControlTuning::direct());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let mut config = SimulationConfig::default();
        config.helicopter.nominal_rotor_rpm = 0.0;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.helicopter.min_rotor_rpm = 500.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.world.tile_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.loop_options.fixed_delta_ms = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.altimeter.landed_speed = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_settings_are_rejected() {
        let mut config = SimulationConfig::default();
        config.helicopter.min_rotor_rpm = f32::NAN;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.helicopter.max_rotor_rpm = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.helicopter.hover_band_max = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.helicopter.power_max_required = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.altimeter.crash_speed = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.controls = Some(ControlTuning::direct());
        config.controls.as_mut().unwrap().yaw.slew_rate = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.world.bounds.max_x = f32::NAN;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SimulationConfig::load("nonexistent_file.yaml"),
            Err(SimError::Io(_))
        ));
    }
}
