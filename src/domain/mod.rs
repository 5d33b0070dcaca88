// Domain layer: wire models and the ports the client and workflows depend on.

pub mod model;
pub mod ports;
