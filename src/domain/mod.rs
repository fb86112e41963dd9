// Domain layer: listing models and the listings source port.

pub mod model;
pub mod ports;
