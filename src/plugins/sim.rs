use bevy::log::{debug, error, info, warn};
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::resources::SimulationConfig;
use crate::systems::KeySetSampler;
use crate::world::{bootstrap_gameplay, Simulation};

/// Fixed steps between flight status lines.
const STATUS_INTERVAL_STEPS: u64 = 600;

#[derive(Resource, Debug, Clone)]
pub struct SimulationSettings(pub SimulationConfig);

/// Host-side frame bookkeeping.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SimulationStats {
    pub frames: u32,
    pub fixed_steps: u64,
    pub clamped_ms: f64,
    last_status_step: u64,
}

/// Drives a [`Simulation`] from the app's clock.
///
/// The simulation owns trait objects that are not `Send`, so it lives in a
/// non-send resource created at startup.
pub struct HeliflightPlugin {
    config: SimulationConfig,
}

impl HeliflightPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Default for HeliflightPlugin {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Plugin for HeliflightPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationSettings(self.config.clone()))
            .init_resource::<SimulationStats>()
            .add_systems(Startup, bootstrap_simulation)
            .add_systems(Update, (drive_simulation, exit_after_max_frames).chain());
    }
}

fn bootstrap_simulation(world: &mut World) {
    let config = world.resource::<SimulationSettings>().0.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    match bootstrap_gameplay(&config, Box::new(KeySetSampler::new()), &mut rng) {
        Ok(mut sim) => {
            sim.start();
            world.insert_non_send_resource(sim);
        }
        Err(e) => {
            error!("Failed to bootstrap simulation: {}", e);
            world.send_event(AppExit::error());
        }
    }
}

fn drive_simulation(
    time: Res<Time>,
    sim: Option<NonSendMut<Simulation>>,
    mut stats: ResMut<SimulationStats>,
) {
    let Some(mut sim) = sim else {
        return;
    };

    stats.frames += 1;
    let Some(metrics) = sim.frame(time.elapsed_secs_f64() * 1000.0) else {
        return;
    };

    stats.fixed_steps += u64::from(metrics.steps_executed);
    debug!(
        "frame {:.2} ms: {} steps, accumulator {:.2} ms",
        metrics.frame_delta_ms, metrics.steps_executed, metrics.accumulator_ms
    );
    if metrics.clamped_ms > 0.0 {
        stats.clamped_ms += metrics.clamped_ms;
        warn!("Frame delta clamped by {:.1} ms", metrics.clamped_ms);
    }

    if stats.fixed_steps - stats.last_status_step >= STATUS_INTERVAL_STEPS {
        stats.last_status_step = stats.fixed_steps;
        log_status(&sim);
    }
}

fn log_status(sim: &Simulation) {
    let Some(readout) = sim.world.avionics.readout else {
        return;
    };
    info!(
        "t={:.1}s alt={:.1} m vs={:.1} m/s hdg={:.0} rpm={:.0} {}",
        sim.sim_loop.elapsed_ms() / 1000.0,
        readout.altitude,
        readout.vertical_speed,
        readout.heading,
        readout.rotor_rpm,
        readout.landing_state
    );
    if let Some(alert) = sim.world.avionics.alert {
        warn!("Caution: {}", alert);
    }
}

fn exit_after_max_frames(
    settings: Res<SimulationSettings>,
    stats: Res<SimulationStats>,
    mut exit: EventWriter<AppExit>,
) {
    let max_frames = settings.0.max_frames;
    if max_frames > 0 && stats.frames == max_frames {
        info!(
            "Stopping after {} frames ({} fixed steps, {:.1} ms clamped)",
            stats.frames, stats.fixed_steps, stats.clamped_ms
        );
        exit.send(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_app(config: SimulationConfig) -> App {
        let mut app = App::new();
        app.init_resource::<Time>().add_plugins(HeliflightPlugin::new(config));
        app
    }

    fn tick(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
        app.update();
    }

    #[test]
    fn test_plugin_bootstraps_and_steps() {
        let mut app = test_app(SimulationConfig::default());
        app.update();
        assert!(app.world().get_non_send_resource::<Simulation>().is_some());

        for _ in 0..10 {
            tick(&mut app, 20);
        }

        let stats = app.world().resource::<SimulationStats>();
        assert_eq!(stats.frames, 11);
        assert!(stats.fixed_steps >= 9);

        let sim = app.world().non_send_resource::<Simulation>();
        assert!(sim.is_running());
        assert_eq!(sim.sim_loop.step_index(), stats.fixed_steps);
    }

    #[test]
    fn test_invalid_config_exits() {
        let mut config = SimulationConfig::default();
        config.world.spawn_zones.clear();

        let mut app = test_app(config);
        app.update();

        assert!(app.world().get_non_send_resource::<Simulation>().is_none());
        assert!(app.should_exit().is_some_and(|exit| exit.is_error()));
    }

    #[test]
    fn test_exit_after_max_frames() {
        let mut config = SimulationConfig::default();
        config.max_frames = 3;

        let mut app = test_app(config);
        for _ in 0..3 {
            tick(&mut app, 16);
        }
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }
}
