pub mod config;
pub mod errors;
pub mod props;
pub mod world;

pub use config::{AvionicsAlertThresholds, NavigationTarget, SimulationConfig, VrsThresholds};
pub use errors::SimError;
pub use props::{BuildingArchetype, BuildingPlacement, PropDressing, PropDressingConfig, TileContentProvider};
pub use world::{SpawnZone, TileKey, TerrainPhysicsConfig, WorldBounds, WorldConfig};
