pub mod components;
pub mod ecs;
pub mod physics;
pub mod plugins;
pub mod resources;
pub mod systems;
pub mod utils;
pub mod world;

pub use ecs::{FixedStepContext, FixedTimestepLoop, LoopFrameMetrics, SystemPhase, SystemScheduler};
pub use resources::{SimError, SimulationConfig};
pub use world::{bootstrap_gameplay, Simulation, SimWorld};
