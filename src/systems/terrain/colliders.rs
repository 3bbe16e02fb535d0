use nalgebra::Vector3;
use rapier3d::prelude::ColliderBuilder;
use std::collections::HashMap;

use super::streaming::{plan_tile_stream, spawn_static_box, TileStreamChange};
use crate::ecs::EntityId;
use crate::physics::{PhysicsError, PhysicsWorld};
use crate::resources::{TileKey, WorldConfig};

/// Streams one fixed ground slab per world tile in a square window around a
/// moving point.
pub struct TerrainColliderManager {
    world: WorldConfig,
    tiles: HashMap<TileKey, EntityId>,
    last_tile: Option<TileKey>,
}

impl TerrainColliderManager {
    pub fn new(world: WorldConfig) -> Self {
        Self {
            world,
            tiles: HashMap::new(),
            last_tile: None,
        }
    }

    /// Re-centers the window on the tile under `(x, z)`.
    ///
    /// Does nothing while the point stays on the last processed tile.
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

        let desired = self
            .world
            .tiles_within_radius(center, self.world.physics.tile_radius);
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
        let center = self.world.tile_center(tile);
        let slab = &self.world.physics;
        let half_size = self.world.tile_size * 0.5;

        let entity = spawn_static_box(
            physics,
            Vector3::new(center.x, slab.ground_offset_y, center.y),
            ColliderBuilder::cuboid(half_size, slab.collider_half_height, half_size).friction(slab.friction),
        )?;

        self.tiles.insert(tile, entity);
        Ok(())
    }

    fn remove_tile(&mut self, physics: &mut PhysicsWorld, tile: TileKey) {
        if let Some(entity) = self.tiles.remove(&tile) {
            physics.remove_physics_for_entity(entity);
        }
    }

    /// Removes every slab and forgets the last position.
    pub fn dispose(&mut self, physics: &mut PhysicsWorld) {
        for (_, entity) in self.tiles.drain() {
            physics.remove_physics_for_entity(entity);
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
        self.tiles.len()
    }
}
