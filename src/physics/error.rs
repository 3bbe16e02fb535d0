use thiserror::Error;

use crate::ecs::EntityId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("Entity {0} is not alive")]
    UnknownEntity(EntityId),
    #[error("Entity {0} has no rigid body")]
    MissingBody(EntityId),
}
