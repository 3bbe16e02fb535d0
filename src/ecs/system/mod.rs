mod fixed_loop;
mod scheduler;

pub use fixed_loop::{
    FixedStepContext, FixedTimestepLoop, FixedTimestepLoopOptions, FrameCallback,
    LoopFrameMetrics,
};
pub use scheduler::SystemScheduler;

use crate::ecs::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed execution phases of a simulation step, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemPhase {
    Input,
    Simulation,
    Physics,
    PostPhysics,
    Late,
}

impl SystemPhase {
    pub const ORDER: [SystemPhase; 5] = [
        SystemPhase::Input,
        SystemPhase::Simulation,
        SystemPhase::Physics,
        SystemPhase::PostPhysics,
        SystemPhase::Late,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SystemPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemPhase::Input => "input",
            SystemPhase::Simulation => "simulation",
            SystemPhase::Physics => "physics",
            SystemPhase::PostPhysics => "post_physics",
            SystemPhase::Late => "late",
        };
        f.write_str(name)
    }
}

/// A unit of per-step work run by the [`SystemScheduler`] against a shared world `W`.
pub trait System<W> {
    fn id(&self) -> &str;
    fn phase(&self) -> SystemPhase;
    fn run(&mut self, ctx: &FixedStepContext, world: &mut W) -> Result<()>;
}

/// Closure-backed system, mostly useful for wiring one-off hooks and tests.
pub struct FnSystem<F> {
    id: String,
    phase: SystemPhase,
    func: F,
}

impl<F> FnSystem<F> {
    pub fn new(id: impl Into<String>, phase: SystemPhase, func: F) -> Self {
        Self {
            id: id.into(),
            phase,
            func,
        }
    }
}

impl<W, F> System<W> for FnSystem<F>
where
    F: FnMut(&FixedStepContext, &mut W) -> Result<()>,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn phase(&self) -> SystemPhase {
        self.phase
    }

    fn run(&mut self, ctx: &FixedStepContext, world: &mut W) -> Result<()> {
        (self.func)(ctx, world)
    }
}
