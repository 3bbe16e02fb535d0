pub mod entity;
pub mod error;
pub mod system;

pub use entity::{EntityId, EntityManager};
pub use error::{EcsError, Result};
pub use system::{
    FixedStepContext, FixedTimestepLoop, FixedTimestepLoopOptions, FnSystem, FrameCallback,
    LoopFrameMetrics, System, SystemPhase, SystemScheduler,
};
