mod assertions;
mod fixtures;
mod test_sim;

pub use assertions::{assert_landed, assert_physics_accounted, assert_position_near, assert_transform_valid};
pub use fixtures::*;
pub use test_sim::{TestSim, TestSimBuilder};
