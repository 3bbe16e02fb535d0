mod collisions;
mod error;
mod handles;
mod world;

pub use collisions::{CollisionEvent, CollisionEventBuffer};
pub use error::PhysicsError;
pub use handles::{PhysicsHandleMap, RemovedHandles};
pub use world::{EntityTransform, PhysicsWorld, DEFAULT_GRAVITY};
