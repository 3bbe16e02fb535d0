mod altimeter;
mod control;
mod helicopter;
mod input;

pub use altimeter::*;
pub use control::*;
pub use helicopter::*;
pub use input::*;
