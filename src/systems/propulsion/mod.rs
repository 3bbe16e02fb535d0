mod rotor;

pub use rotor::*;
