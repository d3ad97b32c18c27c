// Domain layer: plain models and the ports (traits) the core talks through.

pub mod model;
pub mod ports;
