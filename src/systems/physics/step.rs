use crate::ecs::{FixedStepContext, Result, System, SystemPhase};
use crate::world::SimWorld;

/// Advances the rigid-body world by one fixed step.
pub struct PhysicsStepSystem;

impl System<SimWorld> for PhysicsStepSystem {
    fn id(&self) -> &str {
        "physics.step"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Physics
    }

    fn run(&mut self, ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        world.physics.step(ctx.fixed_delta_seconds);
        Ok(())
    }
}
