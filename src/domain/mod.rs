// Domain layer: record shapes and ports (interfaces).

pub mod model;
pub mod ports;
