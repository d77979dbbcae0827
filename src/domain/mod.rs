// Domain layer: request/result models and the ports each stage talks through.

pub mod model;
pub mod ports;
