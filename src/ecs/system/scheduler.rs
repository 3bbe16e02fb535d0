use bevy::log::{debug, error};

use super::{FixedStepContext, System, SystemPhase};

/// Ordered registry of systems grouped by [`SystemPhase`].
///
/// Systems run phase by phase in [`SystemPhase::ORDER`], and in registration
/// order within a phase. The scheduler holds no simulation state of its own.
pub struct SystemScheduler<W> {
    phases: [Vec<Box<dyn System<W>>>; 5],
}

impl<W> SystemScheduler<W> {
    pub fn new() -> Self {
        Self {
            phases: Default::default(),
        }
    }

    /// Registers a system, replacing any existing system with the same id.
    ///
    /// A replaced system is dropped and the new one is appended to the end of
    /// its phase.
    pub fn add_system(&mut self, system: Box<dyn System<W>>) {
        if self.remove_system(system.id()).is_some() {
            debug!("Replacing system '{}'", system.id());
        }
        self.phases[system.phase().index()].push(system);
    }

    /// Removes a system by id from whichever phase holds it. No-op when absent.
    pub fn remove_system(&mut self, id: &str) -> Option<Box<dyn System<W>>> {
        for systems in self.phases.iter_mut() {
            if let Some(position) = systems.iter().position(|system| system.id() == id) {
                return Some(systems.remove(position));
            }
        }
        None
    }

    pub fn clear(&mut self) {
        for systems in self.phases.iter_mut() {
            systems.clear();
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.phases
            .iter()
            .any(|systems| systems.iter().any(|system| system.id() == id))
    }

    pub fn len(&self) -> usize {
        self.phases.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids registered in `phase`, in execution order.
    pub fn system_ids(&self, phase: SystemPhase) -> Vec<&str> {
        self.phases[phase.index()]
            .iter()
            .map(|system| system.id())
            .collect()
    }

    /// Runs every phase in order against `world`.
    ///
    /// A failing system is logged and skipped; the remaining systems still run.
    pub fn run_systems(&mut self, ctx: &FixedStepContext, world: &mut W) {
        for phase in SystemPhase::ORDER {
            for system in self.phases[phase.index()].iter_mut() {
                if let Err(err) = system.run(ctx, world) {
                    error!(
                        "System '{}' ({}) failed at step {}: {}",
                        system.id(),
                        phase,
                        ctx.step_index,
                        err
                    );
                }
            }
        }
    }
}

impl<W> Default for SystemScheduler<W> {
    fn default() -> Self {
        Self::new()
    }
}
