// Domain layer: table and search models plus the ports the pipeline is built on.

pub mod model;
pub mod ports;
