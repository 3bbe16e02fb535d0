pub mod avionics;
pub mod collisions;
pub mod controller;
pub mod input;
pub mod physics;
pub mod propulsion;
pub mod terrain;

pub use avionics::*;
pub use collisions::*;
pub use controller::*;
pub use input::*;
pub use physics::*;
pub use propulsion::*;
pub use terrain::*;
