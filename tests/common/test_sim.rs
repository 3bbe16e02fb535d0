use heliflight::{
    bootstrap_gameplay,
    components::AltimeterState,
    physics::EntityTransform,
    resources::WorldConfig,
    systems::AvionicsState,
    Simulation, SimulationConfig,
};
use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{create_bare_config, SharedKeys};

pub struct TestSimBuilder {
    config: SimulationConfig,
}

impl TestSimBuilder {
    pub fn new() -> Self {
        Self {
            config: create_bare_config(),
        }
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_world(mut self, world: WorldConfig) -> Self {
        self.config.world = world;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> TestSim {
        let keys = SharedKeys::default();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let sim = bootstrap_gameplay(&self.config, Box::new(keys.clone()), &mut rng)
            .expect("Failed to bootstrap simulation");
        TestSim { sim, keys }
    }
}

/// Simulation driven step by step with scripted keys.
pub struct TestSim {
    pub sim: Simulation,
    pub keys: SharedKeys,
}

impl TestSim {
    pub fn run_steps(&mut self, steps: u32) {
        self.sim.run_steps(steps);
    }

    pub fn run_seconds(&mut self, seconds: f64) {
        let fixed_delta_ms = self.sim.sim_loop.options().fixed_delta_ms;
        self.run_steps((seconds * 1000.0 / fixed_delta_ms).round() as u32);
    }

    pub fn press(&mut self, key: &str) {
        self.keys.press(key);
    }

    pub fn release(&mut self, key: &str) {
        self.keys.release(key);
    }

    /// Press and release around a single step.
    pub fn tap(&mut self, key: &str) {
        self.press(key);
        self.run_steps(1);
        self.release(key);
    }

    pub fn transform(&self) -> EntityTransform {
        self.sim
            .world
            .player_transform()
            .expect("Player helicopter has no transform")
    }

    pub fn altimeter(&self) -> AltimeterState {
        self.sim.world.player.altimeter
    }

    pub fn avionics(&self) -> &AvionicsState {
        &self.sim.world.avionics
    }

    /// Moves the airframe and zeroes its velocity.
    pub fn teleport(&mut self, position: Vector3<f32>) {
        let handle = self.sim.world.player.body;
        let body = self
            .sim
            .world
            .physics
            .body_mut(handle)
            .expect("Player helicopter has no body");
        body.set_translation(position, true);
        body.set_linvel(Vector3::zeros(), true);
        body.set_angvel(Vector3::zeros(), true);
    }

    /// Steps until `condition` holds, up to `max_steps`.
    pub fn wait_for_condition<F>(&mut self, max_steps: u32, mut condition: F) -> bool
    where
        F: FnMut(&TestSim) -> bool,
    {
        for _ in 0..max_steps {
            if condition(self) {
                return true;
            }
            self.run_steps(1);
        }
        condition(self)
    }
}
