use bevy::log::info;
use nalgebra::Vector3;
use rand::Rng;

use super::SimWorld;
use crate::components::{GameState, PlayerInputState};
use crate::ecs::{FixedTimestepLoop, LoopFrameMetrics, SystemScheduler};
use crate::physics::PhysicsWorld;
use crate::resources::errors::Result;
use crate::resources::world::pick_spawn_point;
use crate::resources::{PropDressing, SimulationConfig};
use crate::systems::{
    spawn_player_helicopter, AltimeterSystem, AssistToggleSystem, AvionicsState, AvionicsSystem,
    ControlStateSystem, HelicopterFlightSystem, InputSampler, PauseToggleSystem, PhysicsStepSystem,
    PlayerInputSystem, PropColliderManager, PropStreamingSystem, TerrainColliderManager,
    TerrainStreamingSystem, DEFAULT_SPAWN_HEIGHT,
};

/// A running session: the fixed-step loop and the world it drives.
pub struct Simulation {
    pub sim_loop: FixedTimestepLoop<SimWorld>,
    pub world: SimWorld,
}

impl Simulation {
    pub fn start(&mut self) {
        self.sim_loop.start();
    }

    pub fn stop(&mut self) {
        self.sim_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.sim_loop.is_running()
    }

    /// Feeds a frame timestamp [ms] from the host clock.
    pub fn frame(&mut self, timestamp_ms: f64) -> Option<LoopFrameMetrics> {
        self.sim_loop.frame(timestamp_ms, &mut self.world)
    }

    /// Advances by an explicit frame delta [ms], independent of start/stop.
    pub fn advance(&mut self, frame_delta_ms: f64) -> LoopFrameMetrics {
        self.sim_loop.step(frame_delta_ms, &mut self.world)
    }

    /// Runs exactly `steps` fixed steps.
    pub fn run_steps(&mut self, steps: u32) {
        let fixed_delta_ms = self.sim_loop.options().fixed_delta_ms;
        for _ in 0..steps {
            self.sim_loop.advance(fixed_delta_ms, &mut self.world);
        }
    }
}

fn build_scheduler() -> SystemScheduler<SimWorld> {
    let mut scheduler = SystemScheduler::new();

    scheduler.add_system(Box::new(PlayerInputSystem));
    scheduler.add_system(Box::new(ControlStateSystem));

    scheduler.add_system(Box::new(AssistToggleSystem));
    scheduler.add_system(Box::new(PauseToggleSystem));
    scheduler.add_system(Box::new(HelicopterFlightSystem));

    scheduler.add_system(Box::new(PhysicsStepSystem));

    scheduler.add_system(Box::new(AltimeterSystem));
    scheduler.add_system(Box::new(TerrainStreamingSystem));
    scheduler.add_system(Box::new(PropStreamingSystem));

    scheduler.add_system(Box::new(AvionicsSystem));
    scheduler
}

/// Builds a ready-to-run session from `config`.
///
/// Picks a spawn point with `rng`, drops the helicopter there, streams the
/// colliders around it and wires every system in step order. The loop is
/// returned stopped.
pub fn bootstrap_gameplay<R: Rng + ?Sized>(
    config: &SimulationConfig,
    sampler: Box<dyn InputSampler>,
    rng: &mut R,
) -> Result<Simulation> {
    config.validate()?;

    let mut physics = PhysicsWorld::default();
    let spawn = pick_spawn_point(&config.world, rng)?;
    let control_tuning = config.control_tuning();

    let player = spawn_player_helicopter(
        &mut physics,
        config.helicopter.clone(),
        control_tuning.yaw_rate,
        Vector3::new(spawn.x, DEFAULT_SPAWN_HEIGHT, spawn.y),
    )?;

    let mut terrain = TerrainColliderManager::new(config.world.clone());
    terrain.update(&mut physics, spawn.x, spawn.y)?;

    let dressing = PropDressing::new(config.props, config.world.clone());
    let mut props = PropColliderManager::new(config.world.clone(), Box::new(dressing));
    props.update(&mut physics, spawn.x, spawn.y)?;

    info!(
        "Gameplay ready: spawn ({:.1}, {:.1}), preset {}, {} terrain tiles, {} prop colliders",
        spawn.x,
        spawn.y,
        config.control_preset,
        terrain.tile_count(),
        props.collider_count()
    );

    let world = SimWorld {
        physics,
        input: PlayerInputState::new(),
        sampler,
        bindings: config.bindings.clone(),
        control_tuning,
        altimeter_tuning: config.altimeter,
        game_state: GameState::default(),
        player,
        terrain,
        props,
        avionics: AvionicsState::default(),
        alert_thresholds: config.avionics,
        navigation_target: config.navigation_target.clone(),
    };

    let sim_loop = FixedTimestepLoop::with_scheduler(build_scheduler(), config.loop_options);
    Ok(Simulation { sim_loop, world })
}
