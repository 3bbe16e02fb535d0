use nalgebra::Vector3;
use rapier3d::prelude::ColliderBuilder;
use std::collections::HashMap;

use super::streaming::{plan_tile_stream, spawn_static_box, spawn_tile_entities, TileStreamChange};
use crate::ecs::EntityId;
use crate::physics::{PhysicsError, PhysicsWorld};
use crate::resources::{TileContentProvider, TileKey, WorldConfig};

/// Streams static building colliders for the tiles around a moving point.
///
/// Buildings are boxed axis-aligned; placement rotation only affects visuals.
pub struct PropColliderManager {
    world: WorldConfig,
    tile_radius: i32,
    provider: Box<dyn TileContentProvider>,
    tiles: HashMap<TileKey, Vec<EntityId>>,
    last_tile: Option<TileKey>,
}

impl PropColliderManager {
    pub fn new(world: WorldConfig, provider: Box<dyn TileContentProvider>) -> Self {
        let tile_radius = world.physics.tile_radius;
        Self {
            world,
            tile_radius,
            provider,
            tiles: HashMap::new(),
            last_tile: None,
        }
    }

    pub fn with_tile_radius(mut self, tile_radius: i32) -> Self {
        self.tile_radius = tile_radius.max(0);
        self
    }

    pub fn update(
        &mut self,
        physics: &mut PhysicsWorld,
        x: f32,
        z: f32,
    ) -> Result<TileStreamChange, PhysicsError> {
        let center = self.world.tile_index_for_position(x, z);
        if self.last_tile == Some(center) {
            return Ok(TileStreamChange::default());
        }

        let desired = self.world.tiles_within_radius(center, self.tile_radius);
        let mut live: Vec<TileKey> = self.tiles.keys().copied().collect();
        live.sort();
        let change = plan_tile_stream(&live, &desired);

        for tile in &change.removed {
            self.remove_tile(physics, *tile);
        }
        for tile in &change.added {
            self.add_tile(physics, *tile)?;
        }

        self.last_tile = Some(center);
        Ok(change)
    }

    fn add_tile(&mut self, physics: &mut PhysicsWorld, tile: TileKey) -> Result<(), PhysicsError> {
        let mut placements = self.provider.buildings(tile);
        placements.retain(|placement| placement.archetype().has_collider);

        let entities = spawn_tile_entities(physics, &placements, |physics, placement| {
            let archetype = placement.archetype();
            let half_height = archetype.height * 0.5;
            spawn_static_box(
                physics,
                Vector3::new(placement.position.x, half_height, placement.position.z),
                ColliderBuilder::cuboid(archetype.width * 0.5, half_height, archetype.depth * 0.5),
            )
        })?;

        self.tiles.insert(tile, entities);
        Ok(())
    }

    fn remove_tile(&mut self, physics: &mut PhysicsWorld, tile: TileKey) {
        for entity in self.tiles.remove(&tile).unwrap_or_default() {
            physics.remove_physics_for_entity(entity);
        }
    }

    pub fn dispose(&mut self, physics: &mut PhysicsWorld) {
        for (_, entities) in self.tiles.drain() {
            for entity in entities {
                physics.remove_physics_for_entity(entity);
            }
        }
        self.last_tile = None;
    }

    pub fn contains_tile(&self, tile: TileKey) -> bool {
        self.tiles.contains_key(&tile)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn collider_count(&self) -> usize {
        self.tiles.values().map(Vec::len).sum()
    }
}
