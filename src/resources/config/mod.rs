mod avionics;
mod simulation;

pub use avionics::{AvionicsAlertThresholds, NavigationTarget, VrsThresholds};
pub use simulation::SimulationConfig;
