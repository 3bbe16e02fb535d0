use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
use std::collections::HashMap;

use crate::ecs::EntityId;

/// Handles released by [`PhysicsHandleMap::remove_entity`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovedHandles {
    pub body: Option<RigidBodyHandle>,
    pub colliders: Vec<ColliderHandle>,
}

impl RemovedHandles {
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.colliders.is_empty()
    }
}

/// Bidirectional entity <-> rapier handle lookup.
///
/// Game code only ever holds [`EntityId`]s; this is the one place rapier
/// handles are tied back to them.
#[derive(Debug, Default)]
pub struct PhysicsHandleMap {
    entity_to_body: HashMap<EntityId, RigidBodyHandle>,
    body_to_entity: HashMap<RigidBodyHandle, EntityId>,
    entity_to_colliders: HashMap<EntityId, Vec<ColliderHandle>>,
    collider_to_entity: HashMap<ColliderHandle, EntityId>,
}

impl PhysicsHandleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_body(&mut self, entity: EntityId, handle: RigidBodyHandle) {
        if let Some(previous) = self.entity_to_body.insert(entity, handle) {
            self.body_to_entity.remove(&previous);
        }
        self.body_to_entity.insert(handle, entity);
    }

    pub fn link_collider(&mut self, entity: EntityId, handle: ColliderHandle) {
        let colliders = self.entity_to_colliders.entry(entity).or_default();
        if !colliders.contains(&handle) {
            colliders.push(handle);
        }
        self.collider_to_entity.insert(handle, entity);
    }

    pub fn body(&self, entity: EntityId) -> Option<RigidBodyHandle> {
        self.entity_to_body.get(&entity).copied()
    }

    pub fn colliders(&self, entity: EntityId) -> &[ColliderHandle] {
        self.entity_to_colliders
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entity_for_body(&self, handle: RigidBodyHandle) -> Option<EntityId> {
        self.body_to_entity.get(&handle).copied()
    }

    pub fn entity_for_collider(&self, handle: ColliderHandle) -> Option<EntityId> {
        self.collider_to_entity.get(&handle).copied()
    }

    /// Unlinks every handle of `entity` and returns them for release.
    pub fn remove_entity(&mut self, entity: EntityId) -> RemovedHandles {
        let body = self.entity_to_body.remove(&entity);
        if let Some(handle) = body {
            self.body_to_entity.remove(&handle);
        }

        let colliders = self.entity_to_colliders.remove(&entity).unwrap_or_default();
        for handle in &colliders {
            self.collider_to_entity.remove(handle);
        }

        RemovedHandles { body, colliders }
    }

    pub fn clear(&mut self) {
        self.entity_to_body.clear();
        self.body_to_entity.clear();
        self.entity_to_colliders.clear();
        self.collider_to_entity.clear();
    }

    pub fn body_count(&self) -> usize {
        self.entity_to_body.len()
    }

    pub fn collider_count(&self) -> usize {
        self.collider_to_entity.len()
    }
}
