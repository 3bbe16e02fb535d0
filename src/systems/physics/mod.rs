mod flight;
mod step;

pub use flight::*;
pub use step::*;
