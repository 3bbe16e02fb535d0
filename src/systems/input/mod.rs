mod control;
mod player;

pub use control::*;
pub use player::*;
