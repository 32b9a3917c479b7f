// Domain layer: offer models, price normalisation and the ports the pipeline talks through.

pub mod model;
pub mod ports;
pub mod price;
