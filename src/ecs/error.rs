use crate::physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcsError {
    #[error("System '{id}' failed: {message}")]
    SystemFailed { id: String, message: String },

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),
}

pub type Result<T> = std::result::Result<T, EcsError>;
