mod gameplay;

pub use gameplay::{bootstrap_gameplay, Simulation};

use crate::components::{AltimeterTuning, ControlTuning, GameState, PlayerHelicopter, PlayerInputState};
use crate::physics::{EntityTransform, PhysicsWorld};
use crate::resources::{AvionicsAlertThresholds, NavigationTarget};
use crate::systems::{
    AvionicsState, InputSampler, PlayerInputBindings, PropColliderManager, TerrainColliderManager,
};

/// Everything a simulation step reads or writes.
///
/// Systems receive it by `&mut` one after another, so no field needs
/// interior mutability.
pub struct SimWorld {
    pub physics: PhysicsWorld,
    pub input: PlayerInputState,
    pub sampler: Box<dyn InputSampler>,
    pub bindings: PlayerInputBindings,
    pub control_tuning: ControlTuning,
    pub altimeter_tuning: AltimeterTuning,
    pub game_state: GameState,
    pub player: PlayerHelicopter,
    pub terrain: TerrainColliderManager,
    pub props: PropColliderManager,
    pub avionics: AvionicsState,
    pub alert_thresholds: AvionicsAlertThresholds,
    pub navigation_target: Option<NavigationTarget>,
}

impl SimWorld {
    pub fn player_transform(&self) -> Option<EntityTransform> {
        self.physics.entity_transform(self.player.entity)
    }

    /// Releases every streamed collider and the player airframe.
    pub fn dispose(&mut self) {
        self.terrain.dispose(&mut self.physics);
        self.props.dispose(&mut self.physics);
        self.physics.remove_physics_for_entity(self.player.entity);
    }
}
