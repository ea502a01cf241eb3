// Domain layer: API models and the port the HTTP client implements.

pub mod model;
pub mod ports;
