mod colliders;
mod props;
mod streaming;

pub use colliders::*;
pub use props::*;
pub use streaming::*;
