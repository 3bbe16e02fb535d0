mod yaw_rate;

pub use yaw_rate::*;
