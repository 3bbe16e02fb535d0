use crossbeam_channel::Receiver;
use rapier3d::prelude::CollisionEvent as RawCollisionEvent;
use serde::{Deserialize, Serialize};

use super::PhysicsHandleMap;
use crate::ecs::EntityId;

/// Contact start/stop between two tracked entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub a: EntityId,
    pub b: EntityId,
    pub started: bool,
}

/// Collision events produced by the most recent physics step.
#[derive(Debug, Default)]
pub struct CollisionEventBuffer {
    events: Vec<CollisionEvent>,
}

impl CollisionEventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_step(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Moves pending rapier events into the buffer. Events touching colliders
    /// that no entity owns are dropped.
    pub fn drain_from(&mut self, receiver: &Receiver<RawCollisionEvent>, handles: &PhysicsHandleMap) {
        while let Ok(event) = receiver.try_recv() {
            let a = handles.entity_for_collider(event.collider1());
            let b = handles.entity_for_collider(event.collider2());
            if let (Some(a), Some(b)) = (a, b) {
                self.events.push(CollisionEvent {
                    a,
                    b,
                    started: event.started(),
                });
            }
        }
    }
}
