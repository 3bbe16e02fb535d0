mod altimeter;

pub use altimeter::*;
