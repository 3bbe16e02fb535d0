mod id;
mod manager;

pub use id::EntityId;
pub use manager::EntityManager;
