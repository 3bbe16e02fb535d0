use bevy::log::debug;
use nalgebra::Vector3;
use rapier3d::prelude::{ColliderBuilder, RigidBodyBuilder};
use std::collections::HashSet;

use crate::ecs::{EntityId, FixedStepContext, Result, System, SystemPhase};
use crate::physics::{PhysicsError, PhysicsWorld};
use crate::resources::TileKey;
use crate::world::SimWorld;

/// Tiles touched by one streaming update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileStreamChange {
    pub added: Vec<TileKey>,
    pub removed: Vec<TileKey>,
}

impl TileStreamChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Splits the move from `current` to `desired` into removals and additions.
///
/// Removals keep the order of `current`, additions the order of `desired`.
pub fn plan_tile_stream(current: &[TileKey], desired: &[TileKey]) -> TileStreamChange {
    let current_set: HashSet<TileKey> = current.iter().copied().collect();
    let desired_set: HashSet<TileKey> = desired.iter().copied().collect();

    TileStreamChange {
        removed: current
            .iter()
            .filter(|tile| !desired_set.contains(tile))
            .copied()
            .collect(),
        added: desired
            .iter()
            .filter(|tile| !current_set.contains(tile))
            .copied()
            .collect(),
    }
}

/// Creates a fixed body at `translation` carrying `collider`.
///
/// The entity is released again when either insertion fails.
pub fn spawn_static_box(
    physics: &mut PhysicsWorld,
    translation: Vector3<f32>,
    collider: ColliderBuilder,
) -> std::result::Result<EntityId, PhysicsError> {
    let entity = physics.spawn_entity();
    let inserted = physics
        .create_rigid_body_for_entity(entity, RigidBodyBuilder::fixed().translation(translation))
        .and_then(|body| physics.create_collider_for_entity(entity, collider, Some(body)));

    match inserted {
        Ok(_) => Ok(entity),
        Err(err) => {
            physics.remove_physics_for_entity(entity);
            Err(err)
        }
    }
}

/// Spawns one entity per item. On the first failure every entity created so
/// far is removed and the error returned, so a tile is either complete or
/// absent.
pub fn spawn_tile_entities<T>(
    physics: &mut PhysicsWorld,
    items: &[T],
    mut spawn: impl FnMut(&mut PhysicsWorld, &T) -> std::result::Result<EntityId, PhysicsError>,
) -> std::result::Result<Vec<EntityId>, PhysicsError> {
    let mut entities = Vec::with_capacity(items.len());
    for item in items {
        match spawn(physics, item) {
            Ok(entity) => entities.push(entity),
            Err(err) => {
                for entity in entities {
                    physics.remove_physics_for_entity(entity);
                }
                return Err(err);
            }
        }
    }
    Ok(entities)
}

fn player_ground_position(world: &SimWorld) -> std::result::Result<(f32, f32), PhysicsError> {
    let body = world
        .physics
        .body(world.player.body)
        .ok_or(PhysicsError::MissingBody(world.player.entity))?;
    let translation = body.translation();
    Ok((translation.x, translation.z))
}

/// Keeps ground slabs live around the player.
pub struct TerrainStreamingSystem;

impl System<SimWorld> for TerrainStreamingSystem {
    fn id(&self) -> &str {
        "sim.terrain_streaming"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::PostPhysics
    }

    fn run(&mut self, _ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        let (x, z) = player_ground_position(world)?;
        let change = world.terrain.update(&mut world.physics, x, z)?;
        if !change.is_empty() {
            debug!(
                "Terrain colliders: +{} -{} ({} live)",
                change.added.len(),
                change.removed.len(),
                world.terrain.tile_count()
            );
        }
        Ok(())
    }
}

/// Keeps building colliders live around the player.
pub struct PropStreamingSystem;

impl System<SimWorld> for PropStreamingSystem {
    fn id(&self) -> &str {
        "sim.prop_streaming"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::PostPhysics
    }

    fn run(&mut self, _ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        let (x, z) = player_ground_position(world)?;
        let change = world.props.update(&mut world.physics, x, z)?;
        if !change.is_empty() {
            debug!(
                "Prop colliders: +{} -{} tiles ({} colliders)",
                change.added.len(),
                change.removed.len(),
                world.props.collider_count()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_tile_stream() {
        let current = [TileKey::new(0, 0), TileKey::new(1, 0), TileKey::new(2, 0)];
        let desired = [TileKey::new(1, 0), TileKey::new(2, 0), TileKey::new(3, 0)];

        let change = plan_tile_stream(&current, &desired);
        assert_eq!(change.removed, vec![TileKey::new(0, 0)]);
        assert_eq!(change.added, vec![TileKey::new(3, 0)]);

        assert!(plan_tile_stream(&desired, &desired).is_empty());
    }

    fn unit_box(physics: &mut PhysicsWorld, x: &f32) -> std::result::Result<EntityId, PhysicsError> {
        spawn_static_box(physics, Vector3::new(*x, 0.5, 0.0), ColliderBuilder::cuboid(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_spawn_tile_entities() {
        let mut physics = PhysicsWorld::default();
        let entities = spawn_tile_entities(&mut physics, &[0.0, 2.0, 4.0], unit_box).unwrap();

        assert_eq!(entities.len(), 3);
        assert_eq!(physics.collider_count(), 3);
        assert_eq!(physics.entity_count(), 3);
    }

    #[test]
    fn test_failed_spawn_rolls_back_the_tile() {
        let mut physics = PhysicsWorld::default();
        let kept = unit_box(&mut physics, &-10.0).unwrap();

        let result = spawn_tile_entities(&mut physics, &[0.0, 2.0, 4.0, 6.0], |physics, x| {
            if *x > 3.0 {
                let stale = physics.spawn_entity();
                physics.remove_physics_for_entity(stale);
                return Err(PhysicsError::UnknownEntity(stale));
            }
            unit_box(physics, x)
        });

        assert!(matches!(result, Err(PhysicsError::UnknownEntity(_))));
        assert_eq!(physics.collider_count(), 1);
        assert_eq!(physics.body_count(), 1);
        assert_eq!(physics.entity_count(), 1);
        assert!(physics.entity_transform(kept).is_some());
    }
}
