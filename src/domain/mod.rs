// Domain layer: record model and the seams between codecs, storage and runners.

pub mod model;
pub mod ports;
