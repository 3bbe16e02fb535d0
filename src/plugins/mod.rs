mod headless;
mod sim;

pub use headless::*;
pub use sim::*;
