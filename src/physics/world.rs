use crossbeam_channel::{unbounded, Receiver};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use rapier3d::prelude::{
    ActiveEvents, BroadPhaseMultiSap, CCDSolver, ChannelEventCollector, Collider, ColliderHandle,
    ColliderSet, CollisionEvent as RawCollisionEvent, ContactForceEvent, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    QueryFilter, QueryPipeline, Ray, Real, RigidBody, RigidBodyHandle, RigidBodySet,
};
use serde::{Deserialize, Serialize};

use super::{CollisionEvent, CollisionEventBuffer, PhysicsError, PhysicsHandleMap};
use crate::ecs::{EntityId, EntityManager};

pub const DEFAULT_GRAVITY: Vector3<Real> = Vector3::new(0.0, -9.81, 0.0);

/// World pose of a physics-backed entity, as consumed by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityTransform {
    pub translation: Vector3<Real>,
    pub rotation: UnitQuaternion<Real>,
}

/// Owns the rapier pipeline and ties its bodies and colliders to [`EntityId`]s.
pub struct PhysicsWorld {
    pub gravity: Vector3<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: ChannelEventCollector,
    collision_receiver: Receiver<RawCollisionEvent>,
    contact_force_receiver: Receiver<ContactForceEvent>,
    entities: EntityManager,
    handles: PhysicsHandleMap,
    collisions: CollisionEventBuffer,
    query_dirty: bool,
}

impl PhysicsWorld {
    pub fn new(gravity: Vector3<Real>) -> Self {
        let (collision_sender, collision_receiver) = unbounded();
        let (contact_force_sender, contact_force_receiver) = unbounded();

        Self {
            gravity,
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: ChannelEventCollector::new(collision_sender, contact_force_sender),
            collision_receiver,
            contact_force_receiver,
            entities: EntityManager::new(),
            handles: PhysicsHandleMap::new(),
            collisions: CollisionEventBuffer::new(),
            query_dirty: false,
        }
    }

    pub fn spawn_entity(&mut self) -> EntityId {
        self.entities.create()
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn create_rigid_body_for_entity(
        &mut self,
        entity: EntityId,
        body: impl Into<RigidBody>,
    ) -> Result<RigidBodyHandle, PhysicsError> {
        if !self.entities.is_alive(entity) {
            return Err(PhysicsError::UnknownEntity(entity));
        }

        let handle = self.bodies.insert(body);
        self.handles.link_body(entity, handle);
        self.query_dirty = true;
        Ok(handle)
    }

    /// Inserts a collider for `entity`, attached to `parent` when given.
    ///
    /// Collision events are always enabled so contacts show up in
    /// [`PhysicsWorld::collisions`].
    pub fn create_collider_for_entity(
        &mut self,
        entity: EntityId,
        collider: impl Into<Collider>,
        parent: Option<RigidBodyHandle>,
    ) -> Result<ColliderHandle, PhysicsError> {
        if !self.entities.is_alive(entity) {
            return Err(PhysicsError::UnknownEntity(entity));
        }

        let mut collider = collider.into();
        collider.set_active_events(collider.active_events() | ActiveEvents::COLLISION_EVENTS);

        let handle = match parent {
            Some(parent) => {
                if !self.bodies.contains(parent) {
                    return Err(PhysicsError::MissingBody(entity));
                }
                self.colliders
                    .insert_with_parent(collider, parent, &mut self.bodies)
            }
            None => self.colliders.insert(collider),
        };
        self.handles.link_collider(entity, handle);
        self.query_dirty = true;
        Ok(handle)
    }

    /// Removes every collider and the body of `entity`, then retires the id.
    ///
    /// Returns false when there was nothing to remove.
    pub fn remove_physics_for_entity(&mut self, entity: EntityId) -> bool {
        let removed = self.handles.remove_entity(entity);
        let was_alive = self.entities.remove(entity);

        for handle in &removed.colliders {
            self.colliders
                .remove(*handle, &mut self.island_manager, &mut self.bodies, true);
        }
        if let Some(handle) = removed.body {
            self.bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }

        if !removed.is_empty() {
            self.query_dirty = true;
        }
        was_alive || !removed.is_empty()
    }

    pub fn step(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
        self.collisions.begin_step();

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );
        self.query_pipeline.update(&self.colliders);
        self.query_dirty = false;

        self.collisions
            .drain_from(&self.collision_receiver, &self.handles);
        // Contact forces are not consumed; keep the channel from growing.
        while self.contact_force_receiver.try_recv().is_ok() {}

        // rapier keeps user forces until they are reset explicitly
        for (_, body) in self.bodies.iter_mut() {
            if body.is_dynamic() {
                body.reset_forces(false);
                body.reset_torques(false);
            }
        }
    }

    pub fn collisions(&self) -> &[CollisionEvent] {
        self.collisions.events()
    }

    /// Distance along `direction` to the first solid hit, if any within `max_toi`.
    pub fn cast_ray(
        &mut self,
        origin: Point3<Real>,
        direction: Vector3<Real>,
        max_toi: Real,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<Real> {
        if self.query_dirty {
            self.sync_body_positions();
        }

        let mut filter = QueryFilter::default();
        if let Some(body) = exclude {
            filter = filter.exclude_rigid_body(body);
        }

        let ray = Ray::new(origin, direction);
        self.query_pipeline
            .cast_ray(&self.bodies, &self.colliders, &ray, max_toi, true, filter)
            .map(|(_, toi)| toi)
    }

    /// Pushes manual pose edits to attached colliders and the query pipeline.
    pub fn sync_body_positions(&mut self) {
        self.bodies
            .propagate_modified_body_positions_to_colliders(&mut self.colliders);
        self.query_pipeline.update(&self.colliders);
        self.query_dirty = false;
    }

    /// Pose of `entity`, or `None` when it has no live rigid body.
    pub fn entity_transform(&self, entity: EntityId) -> Option<EntityTransform> {
        let handle = self.handles.body(entity)?;
        let body = self.bodies.get(handle)?;
        Some(EntityTransform {
            translation: *body.translation(),
            rotation: *body.rotation(),
        })
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Mutable body access. Pose edits reach ray casts on the next query.
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        let body = self.bodies.get_mut(handle)?;
        self.query_dirty = true;
        Some(body)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn integration_parameters(&self) -> &IntegrationParameters {
        &self.integration_parameters
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}
