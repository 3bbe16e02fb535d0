use heliflight::{
    components::ControlTuning,
    resources::{SpawnZone, WorldConfig},
    systems::{InputSampler, KeySetSampler},
    SimulationConfig,
};
use std::{cell::RefCell, rc::Rc};

/// Key sampler the test keeps a handle to after the simulation takes ownership.
#[derive(Debug, Clone, Default)]
pub struct SharedKeys(Rc<RefCell<KeySetSampler>>);

impl SharedKeys {
    pub fn press(&self, key: &str) {
        self.0.borrow_mut().press(key);
    }

    pub fn release(&self, key: &str) {
        self.0.borrow_mut().release(key);
    }
}

impl InputSampler for SharedKeys {
    fn is_pressed(&self, key: &str) -> bool {
        self.0.borrow().is_pressed(key)
    }

    fn was_just_pressed(&self, key: &str) -> bool {
        self.0.borrow().was_just_pressed(key)
    }

    fn clear_just_pressed(&mut self) {
        self.0.borrow_mut().clear_just_pressed();
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }
}

/// Default config with every building removed, so only terrain slabs and
/// the airframe carry colliders.
pub fn create_bare_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.props.max_buildings_per_tile = 0;
    config.props.settlement_village_chance = 0.0;
    config.props.settlement_town_chance = 0.0;
    config.props.settlement_road_chance = 0.0;
    config
}

/// Bare config with pass-through controls.
pub fn create_direct_config() -> SimulationConfig {
    let mut config = create_bare_config();
    config.controls = Some(ControlTuning::direct());
    config
}

/// World with a single spawn zone of zero radius at `(x, z)`.
pub fn create_pinned_world(x: f32, z: f32) -> WorldConfig {
    WorldConfig {
        spawn_zones: vec![SpawnZone::new("pinned", x, z, 0.0)],
        ..Default::default()
    }
}
